#![deny(missing_docs)]

//! # Document Rendering
//!
//! Converts a `Document` into the OpenAPI 3.0 object model.
//!
//! Maps are built with `serde_json::Map` (insertion ordered via `preserve_order`)
//! so repeated runs serialize byte-identically.

use crate::oas::models::{
    Document, Parameter, PathItem, Property, ResponseBody, ResponseDef, SchemaObject, SchemaRef,
};
use crate::type_mapping::TypeDescriptor;
use serde_json::{json, Map, Value};

/// The OpenAPI version written to the `openapi` field.
pub const OPENAPI_VERSION: &str = "3.0.3";

const JSON_MEDIA_TYPE: &str = "application/json";

/// Renders a document to an ordered JSON value.
pub fn render_document(doc: &Document) -> Value {
    let mut root = Map::new();
    root.insert("openapi".into(), json!(OPENAPI_VERSION));

    let mut info = Map::new();
    info.insert("title".into(), json!(doc.info.title));
    info.insert("version".into(), json!(doc.info.version));
    if let Some(description) = &doc.info.description {
        info.insert("description".into(), json!(description));
    }
    root.insert("info".into(), Value::Object(info));

    let servers = doc
        .servers
        .iter()
        .map(|server| {
            let mut entry = Map::new();
            entry.insert("url".into(), json!(server.url));
            if let Some(description) = &server.description {
                entry.insert("description".into(), json!(description));
            }
            Value::Object(entry)
        })
        .collect();
    root.insert("servers".into(), Value::Array(servers));

    let mut paths = Map::new();
    for (template, items) in &doc.paths {
        let mut path_item = Map::new();
        for item in items {
            path_item.insert(item.method.as_str().into(), render_operation(item));
        }
        paths.insert(template.clone(), Value::Object(path_item));
    }
    root.insert("paths".into(), Value::Object(paths));

    let schemas: Map<String, Value> = doc
        .schemas
        .iter()
        .map(|(name, schema)| (name.clone(), render_schema(schema)))
        .collect();
    root.insert("components".into(), json!({ "schemas": schemas }));

    Value::Object(root)
}

/// Renders a component schema object.
pub fn render_schema(schema: &SchemaObject) -> Value {
    let mut obj = Map::new();
    obj.insert("type".into(), json!("object"));
    if let Some(description) = &schema.description {
        obj.insert("description".into(), json!(description));
    }
    if !schema.required.is_empty() {
        obj.insert("required".into(), json!(schema.required));
    }
    let properties: Map<String, Value> = schema
        .properties
        .iter()
        .map(|(name, prop)| (name.clone(), render_property(prop)))
        .collect();
    obj.insert("properties".into(), Value::Object(properties));
    Value::Object(obj)
}

fn render_property(prop: &Property) -> Value {
    let mut obj = render_type(&prop.ty);
    if prop.read_only {
        obj.insert("readOnly".into(), json!(true));
    }
    if let Some(description) = &prop.description {
        obj.insert("description".into(), json!(description));
    }
    Value::Object(obj)
}

/// Renders the type keywords of a descriptor (`type`, `format`, `maxLength`,
/// `enum`, `items`, `nullable`).
pub fn render_type(ty: &TypeDescriptor) -> Map<String, Value> {
    let mut obj = Map::new();
    obj.insert("type".into(), json!(ty.kind.as_str()));
    if let Some(format) = &ty.format {
        obj.insert("format".into(), json!(format));
    }
    if let Some(max_length) = ty.max_length {
        obj.insert("maxLength".into(), json!(max_length));
    }
    if !ty.enum_values.is_empty() {
        obj.insert("enum".into(), json!(ty.enum_values));
    }
    if let Some(items) = &ty.items {
        obj.insert("items".into(), Value::Object(render_type(items)));
    }
    if ty.nullable {
        obj.insert("nullable".into(), json!(true));
    }
    obj
}

fn render_ref(schema_ref: &SchemaRef) -> Value {
    json!({ "$ref": schema_ref.pointer() })
}

fn render_operation(item: &PathItem) -> Value {
    let mut op = Map::new();
    op.insert("operationId".into(), json!(item.operation_id));
    op.insert("summary".into(), json!(item.summary));
    if let Some(description) = &item.description {
        op.insert("description".into(), json!(description));
    }
    op.insert("tags".into(), json!([item.tag]));

    if !item.parameters.is_empty() {
        let params = item.parameters.iter().map(render_parameter).collect();
        op.insert("parameters".into(), Value::Array(params));
    }

    if let Some(body) = &item.request_body {
        op.insert(
            "requestBody".into(),
            json!({
                "required": true,
                "content": { JSON_MEDIA_TYPE: { "schema": render_ref(body) } }
            }),
        );
    }

    let responses: Map<String, Value> = item
        .responses
        .iter()
        .map(|(status, response)| (status.to_string(), render_response(response)))
        .collect();
    op.insert("responses".into(), Value::Object(responses));

    Value::Object(op)
}

fn render_parameter(param: &Parameter) -> Value {
    let mut obj = Map::new();
    obj.insert("name".into(), json!(param.name));
    obj.insert("in".into(), json!(param.location.as_str()));
    obj.insert("required".into(), json!(param.required));
    if let Some(description) = &param.description {
        obj.insert("description".into(), json!(description));
    }

    let mut schema = render_type(&param.schema.ty);
    if let Some(minimum) = param.schema.minimum {
        schema.insert("minimum".into(), json!(minimum));
    }
    if let Some(maximum) = param.schema.maximum {
        schema.insert("maximum".into(), json!(maximum));
    }
    if let Some(min_length) = param.schema.min_length {
        schema.insert("minLength".into(), json!(min_length));
    }
    if let Some(default) = &param.schema.default {
        schema.insert("default".into(), default.clone());
    }
    obj.insert("schema".into(), Value::Object(schema));

    Value::Object(obj)
}

fn render_response(response: &ResponseDef) -> Value {
    let mut obj = Map::new();
    obj.insert("description".into(), json!(response.description));
    if let Some(body) = &response.body {
        let schema = match body {
            ResponseBody::Schema(r) => render_ref(r),
            ResponseBody::ArrayOf(r) => json!({ "type": "array", "items": render_ref(r) }),
        };
        obj.insert(
            "content".into(),
            json!({ JSON_MEDIA_TYPE: { "schema": schema } }),
        );
    }
    Value::Object(obj)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GeneratorConfig;
    use crate::oas::document::assemble;
    use crate::provider::ColumnDescriptor;
    use crate::type_mapping::TypeKind;

    fn users_doc() -> Document {
        let tables = vec![(
            "users".to_string(),
            vec![
                ColumnDescriptor::new("id", "int").primary_key(),
                ColumnDescriptor::new("name", "varchar(100)"),
                ColumnDescriptor::new("bio", "text").nullable(),
            ],
        )];
        assemble(&tables, &GeneratorConfig::default()).unwrap()
    }

    #[test]
    fn test_root_layout() {
        let value = render_document(&users_doc());
        let keys: Vec<&String> = value.as_object().unwrap().keys().collect();
        assert_eq!(keys, vec!["openapi", "info", "servers", "paths", "components"]);
        assert_eq!(value["openapi"], "3.0.3");
        assert_eq!(value["info"]["title"], "Generated API");
        assert!(value["info"].get("description").is_none());
    }

    #[test]
    fn test_schema_rendering() {
        let value = render_document(&users_doc());
        let user = &value["components"]["schemas"]["User"];
        assert_eq!(user["type"], "object");
        assert_eq!(user["required"], json!(["id", "name"]));
        assert_eq!(user["properties"]["id"]["readOnly"], true);
        assert_eq!(user["properties"]["name"]["maxLength"], 100);
        assert_eq!(user["properties"]["bio"]["nullable"], true);
        assert!(user["properties"]["name"].get("nullable").is_none());
    }

    #[test]
    fn test_operation_rendering() {
        let value = render_document(&users_doc());
        let get = &value["paths"]["/users/{id}"]["get"];
        assert_eq!(get["operationId"], "get_users");
        assert_eq!(get["tags"], json!(["Users"]));
        assert_eq!(get["parameters"][0]["in"], "path");
        assert_eq!(get["parameters"][0]["required"], true);
        assert_eq!(
            get["responses"]["200"]["content"]["application/json"]["schema"]["$ref"],
            "#/components/schemas/User"
        );

        let create = &value["paths"]["/users"]["post"];
        assert_eq!(create["requestBody"]["required"], true);
        assert_eq!(
            create["requestBody"]["content"]["application/json"]["schema"]["$ref"],
            "#/components/schemas/NewUser"
        );

        let list = &value["paths"]["/users"]["get"];
        let schema = &list["responses"]["200"]["content"]["application/json"]["schema"];
        assert_eq!(schema["type"], "array");
        assert_eq!(schema["items"]["$ref"], "#/components/schemas/User");
        assert_eq!(list["parameters"][0]["schema"]["default"], 50);
        assert_eq!(list["parameters"][0]["schema"]["maximum"], 1000);

        let delete = &value["paths"]["/users/{id}"]["delete"];
        assert!(delete["responses"]["204"].get("content").is_none());
    }

    #[test]
    fn test_render_array_type() {
        let mut ty = TypeDescriptor::simple(TypeKind::Array);
        ty.items = Some(Box::new(TypeDescriptor::formatted(TypeKind::Integer, "int32")));
        let rendered = Value::Object(render_type(&ty.with_nullable(true)));
        assert_eq!(
            rendered,
            json!({
                "type": "array",
                "items": { "type": "integer", "format": "int32" },
                "nullable": true
            })
        );
    }
}
