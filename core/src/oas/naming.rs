#![deny(missing_docs)]

//! # Naming Utilities
//!
//! Derives schema names, operation ids and path templates from table names.

use heck::{ToSnakeCase, ToTitleCase, ToUpperCamelCase};

/// Prefix of the create-payload schema.
pub const CREATE_SCHEMA_PREFIX: &str = "New";

/// Name of the shared error schema.
pub const ERROR_SCHEMA_NAME: &str = "Error";

/// Name of the item path parameter.
pub const ID_PARAM: &str = "id";

/// Reduces a plural English noun to its singular form using suffix rules.
///
/// `ies` -> `y`, `sses` -> `ss`, otherwise a trailing `s` is dropped unless the
/// word ends in `ss`, `us` or `is`.
pub fn singularize(word: &str) -> String {
    let lower = word.to_ascii_lowercase();
    if lower.len() > 3 && lower.ends_with("ies") {
        return format!("{}y", &word[..word.len() - 3]);
    }
    if lower.ends_with("sses") {
        return word[..word.len() - 2].to_string();
    }
    if lower.len() > 1
        && lower.ends_with('s')
        && !lower.ends_with("ss")
        && !lower.ends_with("us")
        && !lower.ends_with("is")
    {
        return word[..word.len() - 1].to_string();
    }
    word.to_string()
}

/// Component name of a table's row schema, e.g. `user_roles` -> `UserRole`.
pub fn schema_name(table: &str) -> String {
    singularize(table).to_upper_camel_case()
}

/// Component name of the create payload, e.g. `User` -> `NewUser`.
pub fn create_schema_name(schema_name: &str) -> String {
    format!("{}{}", CREATE_SCHEMA_PREFIX, schema_name)
}

/// Operation id `{verb}_{table}` with the table in snake_case.
pub fn operation_id(verb: &str, table: &str) -> String {
    format!("{}_{}", verb, table.to_snake_case())
}

/// Collection route, `/{table}`.
pub fn collection_path(table: &str) -> String {
    format!("/{}", table)
}

/// Item route, `/{table}/{id}`.
pub fn item_path(table: &str) -> String {
    format!("/{}/{{{}}}", table, ID_PARAM)
}

/// Tag grouping a table's operations, e.g. `user_roles` -> `User Roles`.
pub fn tag_name(table: &str) -> String {
    table.to_title_case()
}

/// Singular resource label used in summaries, e.g. `user_roles` -> `user role`.
pub fn resource_label(table: &str) -> String {
    singularize(table).to_snake_case().replace('_', " ")
}

/// Plural collection label used in summaries, e.g. `user_roles` -> `user roles`.
pub fn collection_label(table: &str) -> String {
    table.to_snake_case().replace('_', " ")
}
