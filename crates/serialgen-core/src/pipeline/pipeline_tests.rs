#![allow(non_snake_case)]

use super::*;

/// Lister that returns nothing; these tests drive `process_source` directly.
struct NoFiles;

impl SourceLister for NoFiles {
    fn list_files(&self, _: &Path, _: &[String], _: bool) -> GenResult<Vec<PathBuf>> {
        Ok(Vec::new())
    }
}

fn pipeline(config: GeneratorConfig) -> Pipeline<NoFiles> {
    let mut registry = MacroRegistry::new();
    registry
        .scan_text(
            Path::new("Macros.h"),
            "#define NotNull /* Validation Function -> DtoValidationUtility::ValidateNotNull */\n",
            &config,
        )
        .unwrap();
    Pipeline::with_registry(config, NoFiles, registry)
}

fn source(src: &str) -> SourceFile {
    SourceFile::from_text("Model.h", src)
}

const TWO_CLASSES: &str = "\
#pragma once
#include <ArduinoJson.h>

//@Serializable
class Point {
public:
    optional<int> x;
};

//@Serializable
class User {
public:
    NotNull
    optional<StdString> name;
    optional<Point> origin;
};
";

#[test]
fn process_source___two_annotated_classes___processes_both() {
    let mut file = source(TWO_CLASSES);

    let classes = pipeline(GeneratorConfig::default())
        .process_source(&mut file)
        .unwrap();

    let names: Vec<_> = classes.iter().map(|c| c.class_name.as_str()).collect();
    assert_eq!(names, vec!["Point", "User"]);
    assert_eq!(classes[1].validated_field_count, 1);
    assert_eq!(classes[1].optional_field_count, 2);

    let text = file.render();
    assert_eq!(text.matches("/*@Serializable*/").count(), 2);
    assert!(!text.contains("//@Serializable"));
    assert_eq!(text.matches("Serialize() const {").count(), 2);
    assert!(text.contains("#include <ArduinoJson.h>\n#include <optional>\n"));
}

#[test]
fn process_source___second_pass___changes_nothing() {
    let p = pipeline(GeneratorConfig::default());
    let mut file = source(TWO_CLASSES);
    p.process_source(&mut file).unwrap();
    let first = file.render();

    let classes = p.process_source(&mut file).unwrap();

    assert!(classes.is_empty());
    assert_eq!(file.render(), first);
}

#[test]
fn process_source___methods_present_but_pending_marker___flips_only() {
    let src = "\
//@Serializable
class Point {
    optional<int> x;
    StdString Serialize() const;
    static Point Deserialize(CStdString& data);
};
";
    let mut file = source(src);

    let classes = pipeline(GeneratorConfig::default())
        .process_source(&mut file)
        .unwrap();

    assert!(classes[0].already_present);
    assert_eq!(file.lines()[0], "#include <optional>");
    assert_eq!(file.lines()[1], "/*@Serializable*/");
    assert_eq!(file.len(), 7);
}

#[test]
fn process_source___class_without_fields___is_no_fields_error() {
    let mut file = source("//@Serializable\nclass Empty {\npublic:\n    void run();\n};\n");

    let result = pipeline(GeneratorConfig::default()).process_source(&mut file);

    assert!(matches!(result, Err(GenError::NoFields { .. })));
}

#[test]
fn process_source___no_optional_fields___does_not_add_include() {
    let mut file = source("//@Serializable\nclass Counter {\n    int count;\n};\n");

    let classes = pipeline(GeneratorConfig::default())
        .process_source(&mut file)
        .unwrap();

    assert_eq!(classes[0].optional_field_count, 0);
    assert!(!file.render().contains("#include"));
    assert!(file.render().contains("// No optional fields to serialize"));
}

#[test]
fn process_source___entity_annotation___records_kind() {
    let config = GeneratorConfig {
        entity_annotation: true,
        ..GeneratorConfig::default()
    };
    let mut file = source("//@Entity\nclass Order {\n    optional<int> id;\n};\n");

    let classes = pipeline(config).process_source(&mut file).unwrap();

    assert_eq!(classes[0].kind, AnnotationKind::Entity);
    assert_eq!(file.lines()[1], "/*@Entity*/");
}

#[test]
fn process_source___no_annotation___is_untouched() {
    let src = "class Point {\n    optional<int> x;\n};\n";
    let mut file = source(src);

    let classes = pipeline(GeneratorConfig::default())
        .process_source(&mut file)
        .unwrap();

    assert!(classes.is_empty());
    assert_eq!(file.render(), src);
}

#[test]
fn run___without_project_dir___is_config_error() {
    let result = pipeline(GeneratorConfig::default()).run();

    assert!(matches!(result, Err(GenError::Config(_))));
}

#[test]
fn Pipeline___new___rejects_invalid_config() {
    let config = GeneratorConfig {
        annotation: "not valid".to_string(),
        ..GeneratorConfig::default()
    };

    assert!(Pipeline::new(config, NoFiles).is_err());
}

#[test]
fn Pipeline___process_class___stale_annotation_line___injects_and_leaves_marker() {
    let p = pipeline(GeneratorConfig::default());
    let mut file =
        source("// header\n//@Serializable\nclass Point {\npublic:\n    optional<int> x;\n};\n");
    let stale = AnnotationMatch {
        class_name: "Point".to_string(),
        annotation_line: 1,
        class_declaration_line: 3,
        annotation_kind: AnnotationKind::Serializable,
        keyword: "Serializable".to_string(),
    };

    let class = p.process_class(&mut file, &stale, &Injector::new()).unwrap();

    assert!(!class.already_present);
    assert_eq!(file.lines()[0], "// header");
    assert_eq!(file.lines()[1], "//@Serializable");
}
