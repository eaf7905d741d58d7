//! Generation of the `Serialize`, `ValidateFields` and `Deserialize` methods.
//!
//! The generated C++ targets ArduinoJson (`JsonDocument`, `serializeJson`,
//! `deserializeJson`) and the `StandardDefines.h` aliases (`StdString`,
//! `CStdString`, `Public`, `Static`). Text is produced at indent level zero;
//! the injector shifts it to the class body's indentation.
//!
//! Only optional fields take part in serialization. Non-optional members are
//! left out of the wire format.

use crate::fields::FieldDescriptor;
use crate::registry::MacroRegistry;
use crate::types::{TypeCategory, TypeClassification, primitive_accessor};
use crate::validation::ValidationFieldMap;

const INDENT: &str = "    ";

/// Separator between accumulated validation messages.
pub const ERROR_SEPARATOR: &str = ",\\n";

/// Signature fragments the injector uses to recognise already generated methods.
pub const SERIALIZE_SIGNATURE: &str = "Serialize()";
pub const DESERIALIZE_SIGNATURE: &str = "Deserialize(";

/// Writes indented lines into a buffer.
struct CodeWriter {
    code: String,
    depth: usize,
}

impl CodeWriter {
    fn new() -> Self {
        Self {
            code: String::new(),
            depth: 0,
        }
    }

    fn line(&mut self, text: impl AsRef<str>) {
        let text = text.as_ref();
        if !text.is_empty() {
            for _ in 0..self.depth {
                self.code.push_str(INDENT);
            }
            self.code.push_str(text);
        }
        self.code.push('\n');
    }

    fn blank(&mut self) {
        self.code.push('\n');
    }

    /// Emit `text` and indent what follows.
    fn open(&mut self, text: impl AsRef<str>) {
        self.line(text);
        self.depth += 1;
    }

    /// Emit `text` one level out, keeping the current depth.
    fn branch(&mut self, text: impl AsRef<str>) {
        self.close(text);
        self.depth += 1;
    }

    /// Dedent and emit `text`.
    fn close(&mut self, text: impl AsRef<str>) {
        self.depth = self.depth.saturating_sub(1);
        self.line(text);
    }

    fn finish(mut self) -> String {
        while self.code.ends_with('\n') {
            self.code.pop();
        }
        self.code
    }
}

/// A field with its classification resolved once.
struct Classified<'a> {
    field: &'a FieldDescriptor,
    class: TypeClassification,
}

impl Classified<'_> {
    fn name(&self) -> &str {
        &self.field.name
    }

    fn inner(&self) -> &str {
        self.class.value_type(&self.field.declared_type)
    }
}

/// Produces method text for one class.
#[derive(Debug, Clone, Copy)]
pub struct MethodSynthesizer<'r> {
    registry: &'r MacroRegistry,
}

impl<'r> MethodSynthesizer<'r> {
    pub fn new(registry: &'r MacroRegistry) -> Self {
        Self { registry }
    }

    /// Generate all three methods, separated by blank lines, without a trailing newline.
    pub fn synthesize(
        &self,
        class_name: &str,
        fields: &[FieldDescriptor],
        validation: &ValidationFieldMap,
    ) -> String {
        let optional: Vec<Classified<'_>> = fields
            .iter()
            .map(|field| Classified {
                field,
                class: field.classification(),
            })
            .filter(|c| c.class.is_optional())
            .collect();

        let mut w = CodeWriter::new();
        write_serialize(&mut w, &optional);
        w.blank();
        self.write_validate(&mut w, validation);
        w.blank();
        write_deserialize(&mut w, class_name, &optional, validation);
        w.finish()
    }

    fn write_validate(&self, w: &mut CodeWriter, validation: &ValidationFieldMap) {
        w.line("// Validation method for all validation macros");
        w.line("Public template<typename DocType>");
        w.open("Static StdString ValidateFields(DocType& doc) {");
        w.line("StdString validationErrors;");
        w.blank();

        let mut emitted = false;
        for (macro_name, field) in validation.pairs() {
            let Some(function) = self.registry.function_for(macro_name) else {
                tracing::debug!(
                    macro_name,
                    field = %field.name,
                    "no validation function registered"
                );
                continue;
            };
            emitted = true;

            let class = field.classification();
            if class.category == TypeCategory::OptionalNestedObject {
                write_nested_validation(w, &field.name, class.value_type(&field.declared_type));
            }

            w.line(format!("// Validate {macro_name} field: {}", field.name));
            w.line(format!("{function}(doc, \"{}\", validationErrors);", field.name));
        }

        if !emitted {
            w.line("// No validation macros defined for this class");
        }

        w.blank();
        w.line("return validationErrors;");
        w.close("}");
    }
}

fn write_serialize(w: &mut CodeWriter, optional: &[Classified<'_>]) {
    w.line("// Serialization method");
    w.open("Public StdString Serialize() const {");
    w.line("// Create JSON document");
    w.line("JsonDocument doc;");
    w.blank();

    if optional.is_empty() {
        w.line("// No optional fields to serialize");
    }

    for field in optional {
        let name = field.name();
        w.line(format!("// Serialize optional field: {name}"));
        w.open(format!("if ({name}.has_value()) {{"));
        match field.class.category {
            TypeCategory::OptionalString => {
                w.line(format!("doc[\"{name}\"] = {name}.value().c_str();"));
            }
            TypeCategory::OptionalPrimitive => {
                w.line(format!("doc[\"{name}\"] = {name}.value();"));
            }
            _ => {
                w.line(format!("// Serialize nested object: {name}"));
                w.line(format!("StdString {name}_json = {name}.value().Serialize();"));
                w.line(format!("JsonDocument {name}_doc;"));
                w.line(format!("deserializeJson({name}_doc, {name}_json.c_str());"));
                w.line(format!("doc[\"{name}\"] = {name}_doc;"));
            }
        }
        w.branch("} else {");
        w.line(format!("doc[\"{name}\"] = nullptr;"));
        w.close("}");
    }

    w.blank();
    w.line("// Serialize to string");
    w.line("StdString output;");
    w.line("serializeJson(doc, output);");
    w.blank();
    w.line("return StdString(output.c_str());");
    w.close("}");
}

fn write_nested_validation(w: &mut CodeWriter, name: &str, nested_type: &str) {
    w.line(format!("// First validate nested object: {name}"));
    w.open(format!("if (!doc[\"{name}\"].isNull()) {{"));
    w.line(format!(
        "JsonObject {name}_obj = doc[\"{name}\"].template as<JsonObject>();"
    ));
    w.line(format!("JsonDocument {name}_doc;"));
    w.line(format!("{name}_doc.set({name}_obj);"));
    w.line(format!(
        "StdString {name}_nested_errors = {nested_type}::ValidateFields({name}_doc);"
    ));
    w.open(format!("if (!{name}_nested_errors.empty()) {{"));
    w.line(format!(
        "if (!validationErrors.empty()) validationErrors += \"{ERROR_SEPARATOR}\";"
    ));
    w.line(format!(
        "validationErrors += \"Validation errors in nested object '{name}': \";"
    ));
    w.line(format!("validationErrors += {name}_nested_errors;"));
    w.close("}");
    w.close("}");
    w.blank();
}

fn write_deserialize(
    w: &mut CodeWriter,
    class_name: &str,
    optional: &[Classified<'_>],
    validation: &ValidationFieldMap,
) {
    w.line("// Deserialization method");
    w.open(format!("Public Static {class_name} Deserialize(CStdString& data) {{"));
    w.line("// Create JSON document");
    w.line("JsonDocument doc;");
    w.blank();
    w.line("// Deserialize JSON string");
    w.line("DeserializationError error = deserializeJson(doc, data.c_str());");
    w.blank();
    w.open("if (error) {");
    w.line("StdString errorMsg = \"JSON parse error: \";");
    w.line("errorMsg += error.c_str();");
    w.line("throw std::runtime_error(errorMsg.c_str());");
    w.close("}");
    w.blank();
    w.line("// Validate all fields with validation macros");
    w.line("StdString validationErrors = ValidateFields(doc);");
    w.open("if (!validationErrors.empty()) {");
    w.line("throw std::runtime_error(validationErrors.c_str());");
    w.close("}");
    w.blank();
    w.line("// Create object with default constructor");
    w.line(format!("{class_name} obj;"));
    w.blank();
    w.line("// Assign values from JSON if present (only optional fields)");

    if optional.is_empty() {
        w.line("// No optional fields to deserialize");
    }

    for field in optional {
        let name = field.name();
        let macros = validation.macros_for(name);
        if macros.is_empty() {
            w.line(format!("// Deserialize optional field: {name}"));
            w.open(format!("if (!doc[\"{name}\"].isNull()) {{"));
            write_assignment(w, field);
            w.close("}");
        } else {
            w.line(format!(
                "// Deserialize {} field: {name} (already validated)",
                macros.join("+")
            ));
            write_assignment(w, field);
        }
    }

    w.blank();
    w.line("return obj;");
    w.close("}");
}

fn write_assignment(w: &mut CodeWriter, field: &Classified<'_>) {
    let name = field.name();
    let inner = field.inner();
    match field.class.category {
        TypeCategory::OptionalString => {
            w.line(format!(
                "obj.{name} = StdString(doc[\"{name}\"].as<const char*>());"
            ));
        }
        TypeCategory::OptionalPrimitive => {
            let accessor = primitive_accessor(inner);
            w.line(format!("obj.{name} = doc[\"{name}\"].as<{accessor}>();"));
        }
        _ => {
            w.line(format!("// Deserialize nested object: {name}"));
            w.line(format!(
                "JsonObject {name}_obj = doc[\"{name}\"].as<JsonObject>();"
            ));
            w.line(format!("StdString {name}_json;"));
            w.line(format!("serializeJson({name}_obj, {name}_json);"));
            w.line(format!("obj.{name} = {inner}::Deserialize({name}_json);"));
        }
    }
}
