#![deny(missing_docs)]

//! # Path Builder
//!
//! Produces the CRUD operations of one table:
//!
//! | Method | Path | Operation |
//! |---|---|---|
//! | GET | `/{table}` | `list_{table}` |
//! | POST | `/{table}` | `create_{table}` |
//! | GET | `/{table}/{id}` | `get_{table}` |
//! | PUT | `/{table}/{id}` | `update_{table}` |
//! | DELETE | `/{table}/{id}` | `delete_{table}` |
//!
//! Item operations need a single-column primary key.

use crate::config::ListOptions;
use crate::oas::models::{
    Diagnostic, HttpMethod, ParamLocation, ParamSchema, Parameter, PathItem, ResponseBody,
    ResponseDef, SchemaObject, SchemaRef, TablePaths,
};
use crate::oas::naming::{
    collection_label, collection_path, create_schema_name, item_path, operation_id,
    resource_label, tag_name, ERROR_SCHEMA_NAME, ID_PARAM,
};
use crate::type_mapping::{TypeDescriptor, TypeKind};
use serde_json::json;
use std::collections::BTreeMap;

/// Column enabling the `created_from` / `created_to` filters.
const CREATED_AT: &str = "created_at";

/// Minimum length of the `search` query.
const SEARCH_MIN_LENGTH: u32 = 3;

/// Builds the operations of `table` for its row `schema`.
pub fn build_paths(table: &str, schema: &SchemaObject, options: &ListOptions) -> TablePaths {
    let ctx = RouteContext::new(table, schema);
    let mut paths = TablePaths::default();

    paths.items.push(ctx.list_operation(options));
    paths.items.push(ctx.create_operation());

    match schema.single_primary_key() {
        Some(pk) => {
            if pk != ID_PARAM {
                paths.diagnostics.push(Diagnostic::info(
                    table,
                    format!("Path parameter '{}' addresses key column '{}'", ID_PARAM, pk),
                ));
            }
            let id_param = ctx.id_parameter(pk);
            paths.items.push(ctx.get_operation(pk, id_param.clone()));
            paths.items.push(ctx.update_operation(pk, id_param.clone()));
            paths.items.push(ctx.delete_operation(pk, id_param));
        }
        None if schema.primary_keys.is_empty() => {
            paths.diagnostics.push(Diagnostic::warning(
                table,
                "Table has no primary key; item operations omitted",
            ));
        }
        None => {
            paths.diagnostics.push(Diagnostic::warning(
                table,
                format!(
                    "Composite primary key ({}); item operations omitted",
                    schema.primary_keys.join(", ")
                ),
            ));
        }
    }

    paths
}

struct RouteContext<'a> {
    table: &'a str,
    schema: &'a SchemaObject,
    resource: String,
    collection: String,
    tag: String,
}

impl<'a> RouteContext<'a> {
    fn new(table: &'a str, schema: &'a SchemaObject) -> Self {
        Self {
            table,
            schema,
            resource: resource_label(table),
            collection: collection_label(table),
            tag: tag_name(table),
        }
    }

    fn operation(&self, method: HttpMethod, path: String, verb: &str, summary: String) -> PathItem {
        PathItem {
            path,
            method,
            operation_id: operation_id(verb, self.table),
            summary,
            description: None,
            tag: self.tag.clone(),
            parameters: Vec::new(),
            request_body: None,
            responses: BTreeMap::new(),
        }
    }

    fn row_ref(&self) -> SchemaRef {
        SchemaRef::new(&self.schema.name)
    }

    fn error_response(description: &str) -> ResponseDef {
        ResponseDef::with_body(
            description,
            ResponseBody::Schema(SchemaRef::new(ERROR_SCHEMA_NAME)),
        )
    }

    fn not_found(&self) -> ResponseDef {
        Self::error_response(&format!("{} not found.", capitalize(&self.resource)))
    }

    fn list_operation(&self, options: &ListOptions) -> PathItem {
        let mut op = self.operation(
            HttpMethod::Get,
            collection_path(self.table),
            "list",
            format!("List {}", self.collection),
        );
        op.description = Some(format!(
            "Retrieves a paginated list of {}.",
            self.collection
        ));
        op.parameters = self.list_parameters(options);
        op.responses.insert(
            200,
            ResponseDef::with_body(
                format!("A list of {}.", self.collection),
                ResponseBody::ArrayOf(self.row_ref()),
            ),
        );
        op.responses
            .insert(400, Self::error_response("Invalid query parameters."));
        op
    }

    fn create_operation(&self) -> PathItem {
        let mut op = self.operation(
            HttpMethod::Post,
            collection_path(self.table),
            "create",
            format!("Create a new {}", self.resource),
        );
        op.description = Some(format!("Adds a new {} to the system.", self.resource));
        op.request_body = Some(SchemaRef::new(create_schema_name(&self.schema.name)));
        op.responses.insert(
            201,
            ResponseDef::with_body(
                format!("{} created successfully.", capitalize(&self.resource)),
                ResponseBody::Schema(self.row_ref()),
            ),
        );
        op.responses
            .insert(400, Self::error_response("Invalid input data."));
        op
    }

    fn get_operation(&self, pk: &str, id_param: Parameter) -> PathItem {
        let mut op = self.operation(
            HttpMethod::Get,
            item_path(self.table),
            "get",
            format!("Get {} by {}", self.resource, pk),
        );
        op.description = Some(format!(
            "Retrieves a single {} by its {}.",
            self.resource, pk
        ));
        op.parameters.push(id_param);
        op.responses.insert(
            200,
            ResponseDef::with_body(
                format!("{} found.", capitalize(&self.resource)),
                ResponseBody::Schema(self.row_ref()),
            ),
        );
        op.responses.insert(404, self.not_found());
        op
    }

    fn update_operation(&self, pk: &str, id_param: Parameter) -> PathItem {
        let mut op = self.operation(
            HttpMethod::Put,
            item_path(self.table),
            "update",
            format!("Update {} by {}", self.resource, pk),
        );
        op.description = Some(format!("Updates an existing {}.", self.resource));
        op.parameters.push(id_param);
        op.request_body = Some(self.row_ref());
        op.responses.insert(
            200,
            ResponseDef::with_body(
                format!("{} updated successfully.", capitalize(&self.resource)),
                ResponseBody::Schema(self.row_ref()),
            ),
        );
        op.responses
            .insert(400, Self::error_response("Invalid input data."));
        op.responses.insert(404, self.not_found());
        op
    }

    fn delete_operation(&self, pk: &str, id_param: Parameter) -> PathItem {
        let mut op = self.operation(
            HttpMethod::Delete,
            item_path(self.table),
            "delete",
            format!("Delete {} by {}", self.resource, pk),
        );
        op.description = Some(format!("Deletes a {} from the system.", self.resource));
        op.parameters.push(id_param);
        op.responses.insert(
            204,
            ResponseDef::empty(format!(
                "{} deleted successfully.",
                capitalize(&self.resource)
            )),
        );
        op.responses.insert(404, self.not_found());
        op
    }

    /// The `{id}` path parameter, typed like the primary key column.
    fn id_parameter(&self, pk: &str) -> Parameter {
        let ty = self
            .schema
            .properties
            .get(pk)
            .map(|prop| prop.ty.clone())
            .unwrap_or_else(|| TypeDescriptor::simple(TypeKind::String))
            .with_nullable(false);

        Parameter {
            name: ID_PARAM.to_string(),
            location: ParamLocation::Path,
            required: true,
            schema: ParamSchema::new(ty),
            description: Some(format!("The {} of the {}.", pk, self.resource)),
        }
    }

    fn list_parameters(&self, options: &ListOptions) -> Vec<Parameter> {
        let int32 = || TypeDescriptor::formatted(TypeKind::Integer, "int32");

        let mut params = vec![
            query(
                "limit",
                ParamSchema::new(int32())
                    .with_default(json!(options.default_limit))
                    .with_range(Some(1), Some(i64::from(options.max_limit))),
                "Maximum number of results to return",
            ),
            query(
                "offset",
                ParamSchema::new(int32())
                    .with_default(json!(0))
                    .with_range(Some(0), None),
                "Number of results to skip",
            ),
        ];

        if options.sorting && options.sortable_columns > 0 {
            let columns: Vec<String> = self
                .schema
                .properties
                .keys()
                .take(options.sortable_columns)
                .cloned()
                .collect();
            if let Some(first) = columns.first() {
                let mut sort_ty = TypeDescriptor::simple(TypeKind::String);
                sort_ty.enum_values = columns.clone();
                params.push(query(
                    "sort_by",
                    ParamSchema::new(sort_ty).with_default(json!(first)),
                    "Field to sort by",
                ));
            }

            let mut order_ty = TypeDescriptor::simple(TypeKind::String);
            order_ty.enum_values = vec!["asc".to_string(), "desc".to_string()];
            params.push(query(
                "sort_order",
                ParamSchema::new(order_ty).with_default(json!("asc")),
                "Sort direction",
            ));
        }

        if options.date_filters && self.schema.properties.contains_key(CREATED_AT) {
            let date_time = || TypeDescriptor::formatted(TypeKind::String, "date-time");
            params.push(query(
                "created_from",
                ParamSchema::new(date_time()),
                "Only records created at or after this instant",
            ));
            params.push(query(
                "created_to",
                ParamSchema::new(date_time()),
                "Only records created at or before this instant",
            ));
        }

        if options.search {
            let text_columns: Vec<&str> = self
                .schema
                .properties
                .iter()
                .filter(|(_, prop)| prop.ty.is_plain_string())
                .map(|(name, _)| name.as_str())
                .collect();
            if text_columns.len() > 1 {
                let shown = text_columns
                    .iter()
                    .take(3)
                    .copied()
                    .collect::<Vec<_>>()
                    .join(", ");
                let more = if text_columns.len() > 3 { "..." } else { "" };
                params.push(query(
                    "search",
                    ParamSchema::new(TypeDescriptor::simple(TypeKind::String))
                        .with_min_length(SEARCH_MIN_LENGTH),
                    &format!("Search across text fields: {}{}", shown, more),
                ));
            }
        }

        params
    }
}

fn query(name: &str, schema: ParamSchema, description: &str) -> Parameter {
    Parameter {
        name: name.to_string(),
        location: ParamLocation::Query,
        required: false,
        schema,
        description: Some(description.to_string()),
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oas::models::DiagnosticLevel;
    use crate::oas::schemas::build_schema;
    use crate::provider::ColumnDescriptor;

    fn users_schema() -> SchemaObject {
        build_schema(
            "users",
            &[
                ColumnDescriptor::new("id", "int").primary_key(),
                ColumnDescriptor::new("name", "varchar(100)"),
                ColumnDescriptor::new("bio", "text").nullable(),
            ],
        )
        .unwrap()
    }

    fn ids(paths: &TablePaths) -> Vec<&str> {
        paths.items.iter().map(|i| i.operation_id.as_str()).collect()
    }

    #[test]
    fn test_five_operations_in_order() {
        let paths = build_paths("users", &users_schema(), &ListOptions::default());
        assert_eq!(
            ids(&paths),
            vec![
                "list_users",
                "create_users",
                "get_users",
                "update_users",
                "delete_users"
            ]
        );
        assert!(paths.diagnostics.is_empty());

        let routes: Vec<(HttpMethod, &str)> = paths
            .items
            .iter()
            .map(|i| (i.method, i.path.as_str()))
            .collect();
        assert_eq!(
            routes,
            vec![
                (HttpMethod::Get, "/users"),
                (HttpMethod::Post, "/users"),
                (HttpMethod::Get, "/users/{id}"),
                (HttpMethod::Put, "/users/{id}"),
                (HttpMethod::Delete, "/users/{id}"),
            ]
        );
        assert!(paths.items.iter().all(|i| i.tag == "Users"));
    }

    #[test]
    fn test_list_pagination_defaults() {
        let paths = build_paths("users", &users_schema(), &ListOptions::default());
        let list = &paths.items[0];
        let limit = &list.parameters[0];
        assert_eq!(limit.name, "limit");
        assert_eq!(limit.location, ParamLocation::Query);
        assert!(!limit.required);
        assert_eq!(limit.schema.default, Some(json!(50)));
        assert_eq!(limit.schema.minimum, Some(1));
        assert_eq!(limit.schema.maximum, Some(1000));

        let offset = &list.parameters[1];
        assert_eq!(offset.name, "offset");
        assert_eq!(offset.schema.default, Some(json!(0)));
        assert_eq!(offset.schema.minimum, Some(0));
        assert_eq!(offset.schema.maximum, None);

        assert_eq!(
            list.responses[&200].body,
            Some(ResponseBody::ArrayOf(SchemaRef::new("User")))
        );
        assert_eq!(
            list.responses[&400].body,
            Some(ResponseBody::Schema(SchemaRef::new("Error")))
        );
    }

    #[test]
    fn test_bodies_and_responses() {
        let paths = build_paths("users", &users_schema(), &ListOptions::default());
        let create = &paths.items[1];
        assert_eq!(create.request_body, Some(SchemaRef::new("NewUser")));
        assert_eq!(create.responses.keys().collect::<Vec<_>>(), vec![&201, &400]);

        let get = &paths.items[2];
        assert_eq!(get.request_body, None);
        assert_eq!(get.responses.keys().collect::<Vec<_>>(), vec![&200, &404]);

        let update = &paths.items[3];
        assert_eq!(update.request_body, Some(SchemaRef::new("User")));
        assert_eq!(
            update.responses.keys().collect::<Vec<_>>(),
            vec![&200, &400, &404]
        );

        let delete = &paths.items[4];
        assert_eq!(delete.responses.keys().collect::<Vec<_>>(), vec![&204, &404]);
        assert_eq!(delete.responses[&204].body, None);
    }

    #[test]
    fn test_id_parameter_typed_from_key() {
        let schema = build_schema(
            "sessions",
            &[ColumnDescriptor::new("token", "uuid").primary_key().nullable()],
        )
        .unwrap();
        let paths = build_paths("sessions", &schema, &ListOptions::default());
        let id = &paths.items[2].parameters[0];
        assert_eq!(id.name, "id");
        assert_eq!(id.location, ParamLocation::Path);
        assert!(id.required);
        assert_eq!(id.schema.ty.format.as_deref(), Some("uuid"));
        assert!(!id.schema.ty.nullable);

        assert_eq!(paths.diagnostics.len(), 1);
        assert_eq!(paths.diagnostics[0].level, DiagnosticLevel::Info);
        assert!(paths.diagnostics[0].message.contains("'token'"));
    }

    #[test]
    fn test_no_primary_key_omits_item_routes() {
        let schema = build_schema("logs", &[ColumnDescriptor::new("line", "text")]).unwrap();
        let paths = build_paths("logs", &schema, &ListOptions::default());
        assert_eq!(ids(&paths), vec!["list_logs", "create_logs"]);
        assert_eq!(paths.diagnostics.len(), 1);
        assert!(paths.diagnostics[0].message.contains("no primary key"));
    }

    #[test]
    fn test_composite_key_omits_item_routes() {
        let schema = build_schema(
            "user_roles",
            &[
                ColumnDescriptor::new("user_id", "int").primary_key(),
                ColumnDescriptor::new("role_id", "int").primary_key(),
            ],
        )
        .unwrap();
        let paths = build_paths("user_roles", &schema, &ListOptions::default());
        assert_eq!(ids(&paths), vec!["list_user_roles", "create_user_roles"]);
        assert!(paths.diagnostics[0].message.contains("user_id, role_id"));
    }

    #[test]
    fn test_list_filters() {
        let schema = build_schema(
            "notes",
            &[
                ColumnDescriptor::new("id", "int").primary_key(),
                ColumnDescriptor::new("title", "varchar(80)"),
                ColumnDescriptor::new("body", "text"),
                ColumnDescriptor::new("created_at", "datetime"),
            ],
        )
        .unwrap();
        let paths = build_paths("notes", &schema, &ListOptions::default());
        let names: Vec<&str> = paths.items[0]
            .parameters
            .iter()
            .map(|p| p.name.as_str())
            .collect();
        assert_eq!(
            names,
            vec![
                "limit",
                "offset",
                "sort_by",
                "sort_order",
                "created_from",
                "created_to",
                "search"
            ]
        );

        let sort_by = &paths.items[0].parameters[2];
        assert_eq!(
            sort_by.schema.ty.enum_values,
            vec!["id", "title", "body", "created_at"]
        );
        let search = &paths.items[0].parameters[6];
        assert_eq!(search.schema.min_length, Some(3));
    }

    #[test]
    fn test_list_filters_disabled() {
        let options = ListOptions {
            sorting: false,
            date_filters: false,
            search: false,
            ..ListOptions::default()
        };
        let paths = build_paths("users", &users_schema(), &options);
        assert_eq!(paths.items[0].parameters.len(), 2);
    }

    #[test]
    fn test_sortable_columns_limit() {
        let options = ListOptions {
            sortable_columns: 2,
            ..ListOptions::default()
        };
        let paths = build_paths("users", &users_schema(), &options);
        let sort_by = &paths.items[0].parameters[2];
        assert_eq!(sort_by.schema.ty.enum_values, vec!["id", "name"]);
    }

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("user role"), "User role");
        assert_eq!(capitalize(""), "");
    }
}
