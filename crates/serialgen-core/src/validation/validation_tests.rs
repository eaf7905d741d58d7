#![allow(non_snake_case)]

use super::*;
use crate::config::GeneratorConfig;
use std::path::Path;

fn registry() -> MacroRegistry {
    let mut registry = MacroRegistry::new();
    registry
        .scan_text(
            Path::new("Macros.h"),
            "#define NotNull /* Validation Function -> DtoValidationUtility::ValidateNotNull */\n\
             #define NotEmpty /* Validation Function -> DtoValidationUtility::ValidateNotEmpty */\n",
            &GeneratorConfig::default(),
        )
        .unwrap();
    registry
}

fn extract(src: &str, class: &str) -> GenResult<ValidationFieldMap> {
    let registry = registry();
    ValidationFieldExtractor::new(&registry).extract(&SourceFile::from_text("User.h", src), class)
}

#[test]
fn extract___macro_above_field___associates_field() {
    let src = "\
class User {
public:
    NotNull
    optional<StdString> name;
    optional<int> age;
};
";

    let map = extract(src, "User").unwrap();

    let fields = map.get("NotNull").unwrap();
    assert_eq!(fields.len(), 1);
    assert_eq!(fields[0].name, "name");
    assert_eq!(fields[0].access, Access::Public);
    assert!(map.is_validated("name"));
    assert!(!map.is_validated("age"));
}

#[test]
fn extract___comments_and_blank_lines___are_skipped_in_lookahead() {
    let src = "\
class User {
    NotNull

    // the user's name
    optional<StdString> name;
};
";

    let map = extract(src, "User").unwrap();

    assert_eq!(map.get("NotNull").unwrap()[0].name, "name");
}

#[test]
fn extract___field_beyond_lookahead___is_not_associated() {
    let src = "\
class User {
    NotNull
    //
    //
    //
    //
    //
    optional<StdString> name;
};
";

    let map = extract(src, "User").unwrap();

    assert!(map.is_empty());
}

#[test]
fn extract___macro_followed_by_macro___drops_first_association() {
    let src = "\
class User {
    NotNull
    NotEmpty
    optional<StdString> name;
};
";

    let map = extract(src, "User").unwrap();

    assert!(map.get("NotNull").is_none());
    assert_eq!(map.get("NotEmpty").unwrap()[0].name, "name");
}

#[test]
fn extract___access_specifier_before_field___stops_lookahead() {
    let src = "\
class User {
    NotNull
private:
    optional<StdString> name;
};
";

    assert!(extract(src, "User").unwrap().is_empty());
}

#[test]
fn extract___call_initialized_declaration_after_macro___stops_lookahead() {
    let src = "\
class User {
    NotNull
    int cached = compute();
    optional<int> later;
};
";

    assert!(extract(src, "User").unwrap().is_empty());
}

#[test]
fn extract___commented_macro___is_ignored() {
    let src = "\
class User {
    // NotNull
    /*
    NotNull
    */
    optional<StdString> name;
};
";

    assert!(extract(src, "User").unwrap().is_empty());
}

#[test]
fn extract___multiple_macros___preserve_encounter_order() {
    let src = "\
class User {
    NotEmpty
    optional<StdString> email;
    NotNull
    optional<StdString> name;
    NotNull
    optional<int> age;
};
";

    let map = extract(src, "User").unwrap();

    let order: Vec<_> = map.pairs().map(|(m, f)| (m, f.name.as_str())).collect();
    assert_eq!(
        order,
        vec![("NotEmpty", "email"), ("NotNull", "name"), ("NotNull", "age")]
    );
    assert_eq!(map.field_count(), 3);
    assert_eq!(map.macros_for("name"), vec!["NotNull"]);
}

#[test]
fn extract___access_tracked_across_macros___records_active_level() {
    let src = "\
class User {
protected:
    NotNull
    optional<int> id;
};
";

    let map = extract(src, "User").unwrap();

    assert_eq!(map.get("NotNull").unwrap()[0].access, Access::Protected);
}

#[test]
fn extract___macro_inside_method_body___is_ignored() {
    let src = "\
class User {
    void run() {
        NotNull
        int local;
    }
    optional<int> id;
};
";

    assert!(extract(src, "User").unwrap().is_empty());
}

#[test]
fn extract___missing_class___is_class_not_found() {
    let result = extract("class Other {\n};\n", "User");

    assert!(matches!(result, Err(GenError::ClassNotFound { .. })));
}

#[test]
fn check_orphans___unknown_field___is_an_error() {
    let mut map = ValidationFieldMap::new();
    map.push("NotNull", FieldDescriptor::new("optional<int>", "ghost", Access::None));
    let fields = vec![FieldDescriptor::new("optional<int>", "real", Access::None)];

    let result = map.check_orphans("User", &fields);

    assert!(matches!(
        result,
        Err(GenError::OrphanedValidationField { ref field, .. }) if field == "ghost"
    ));
}

#[test]
fn check_orphans___known_fields___pass() {
    let mut map = ValidationFieldMap::new();
    map.push("NotNull", FieldDescriptor::new("optional<int>", "real", Access::None));
    let fields = vec![FieldDescriptor::new("optional<int>", "real", Access::None)];

    assert!(map.check_orphans("User", &fields).is_ok());
}
