//! OpenAPI documentation of declared replies
//!
//! Every mapping of a handler becomes a response entry of the handler's operation,
//! keyed by status code. Several mappings sharing a status code are folded into
//! one entry whose description lists each of them, joined by `" / "` in
//! declaration order.

use crate::mapping::{HandlerKey, HandlerRegistry, Mappings};
use axum::http::Method;
use std::collections::BTreeMap;
use std::collections::btree_map::Entry;
use std::sync::Arc;
use utoipa::Modify;
use utoipa::openapi::{
    OpenApi, RefOr,
    content::ContentBuilder,
    path::{Operation, PathItemType},
    response::{Response, ResponseBuilder, Responses, ResponsesBuilder},
    schema::{ObjectBuilder, Schema, SchemaType},
};

/// Content type of every documented reply
pub const PLAIN_TEXT: &str = "text/plain";

/// Produces the schema describing a plain-text reply body
pub trait SchemaGenerator: Send + Sync {
    fn string_schema(&self) -> RefOr<Schema>;
}

/// Emits an inline `{"type": "string"}` schema
#[derive(Debug, Clone, Copy, Default)]
pub struct InlineSchemaGenerator;

impl SchemaGenerator for InlineSchemaGenerator {
    fn string_schema(&self) -> RefOr<Schema> {
        RefOr::T(Schema::Object(
            ObjectBuilder::new().schema_type(SchemaType::String).build(),
        ))
    }
}

/// What the merger needs to document one operation
pub struct DocumentationContext<'a> {
    mappings: &'a Mappings,
    schema_generator: &'a dyn SchemaGenerator,
}

impl<'a> DocumentationContext<'a> {
    pub fn new(mappings: &'a Mappings, schema_generator: &'a dyn SchemaGenerator) -> Self {
        Self {
            mappings,
            schema_generator,
        }
    }

    pub fn mappings(&self) -> &Mappings {
        self.mappings
    }
}

/// Documented responses for a handler's mappings, one per distinct status code
pub fn document_responses(
    mappings: &Mappings,
    schema_generator: &dyn SchemaGenerator,
) -> Responses {
    let mut responses = ResponsesBuilder::new().build();
    merge_responses(&mut responses.responses, mappings, schema_generator);
    responses
}

/// Merge the context's mappings into an operation's responses.
///
/// Does nothing when either side is missing.
pub fn apply(operation: Option<&mut Operation>, context: Option<&DocumentationContext<'_>>) {
    let (Some(operation), Some(context)) = (operation, context) else {
        return;
    };
    merge_responses(
        &mut operation.responses.responses,
        context.mappings,
        context.schema_generator,
    );
}

fn merge_responses(
    responses: &mut BTreeMap<String, RefOr<Response>>,
    mappings: &Mappings,
    schema_generator: &dyn SchemaGenerator,
) {
    for mapping in mappings {
        let description = mapping.description();
        let status = mapping.status().as_u16();

        match responses.entry(status.to_string()) {
            Entry::Vacant(entry) => {
                let content = ContentBuilder::new()
                    .schema(schema_generator.string_schema())
                    .build();
                entry.insert(RefOr::T(
                    ResponseBuilder::new()
                        .description(description)
                        .content(PLAIN_TEXT, content)
                        .build(),
                ));
            }
            Entry::Occupied(mut entry) => match entry.get_mut() {
                RefOr::T(response) => {
                    response.description.push_str(" / ");
                    response.description.push_str(description);
                }
                RefOr::Ref(reference) => {
                    tracing::debug!(
                        "Not merging into referenced response {} for status {}",
                        reference.ref_location,
                        status
                    );
                }
            },
        }
    }
}

/// Documentation pipeline hook
///
/// Walks every operation of the document and merges the mappings registered for
/// the same method and path template.
///
/// # Example
/// ```
/// use replyon::docs::{InlineSchemaGenerator, ReplyOnExceptionDocs};
/// use replyon::mapping::HandlerRegistry;
/// use std::sync::Arc;
/// use utoipa::Modify;
/// use utoipa::openapi::OpenApiBuilder;
///
/// let docs = ReplyOnExceptionDocs::new(
///     Arc::new(HandlerRegistry::new()),
///     Arc::new(InlineSchemaGenerator),
/// );
/// let mut openapi = OpenApiBuilder::new().build();
/// docs.modify(&mut openapi);
/// ```
pub struct ReplyOnExceptionDocs {
    registry: Arc<HandlerRegistry>,
    schema_generator: Arc<dyn SchemaGenerator>,
}

impl ReplyOnExceptionDocs {
    pub fn new(registry: Arc<HandlerRegistry>, schema_generator: Arc<dyn SchemaGenerator>) -> Self {
        Self {
            registry,
            schema_generator,
        }
    }
}

impl Modify for ReplyOnExceptionDocs {
    fn modify(&self, openapi: &mut OpenApi) {
        for (path, item) in openapi.paths.paths.iter_mut() {
            for (kind, operation) in item.operations.iter_mut() {
                let key = HandlerKey::new(method_of(kind), path.as_str());
                let Some(mappings) = self.registry.get(&key) else {
                    continue;
                };

                tracing::debug!("Documenting {} reply mapping(s) for {}", mappings.len(), key);
                let context = DocumentationContext::new(&mappings, self.schema_generator.as_ref());
                apply(Some(operation), Some(&context));
            }
        }
    }
}

fn method_of(kind: &PathItemType) -> Method {
    match kind {
        PathItemType::Get => Method::GET,
        PathItemType::Post => Method::POST,
        PathItemType::Put => Method::PUT,
        PathItemType::Delete => Method::DELETE,
        PathItemType::Options => Method::OPTIONS,
        PathItemType::Head => Method::HEAD,
        PathItemType::Patch => Method::PATCH,
        PathItemType::Trace => Method::TRACE,
        PathItemType::Connect => Method::CONNECT,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exception::Exception;
    use crate::mapping::Mapping;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use utoipa::openapi::{
        OpenApiBuilder, PathsBuilder,
        path::{OperationBuilder, PathItemBuilder},
    };

    #[derive(Debug, thiserror::Error)]
    #[error("exception a")]
    struct ExceptionA;

    #[derive(Default)]
    struct CountingGenerator {
        calls: AtomicUsize,
    }

    impl SchemaGenerator for CountingGenerator {
        fn string_schema(&self) -> RefOr<Schema> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            InlineSchemaGenerator.string_schema()
        }
    }

    fn inline(responses: &Responses, status: &str) -> Response {
        match responses.responses.get(status) {
            Some(RefOr::T(response)) => response.clone(),
            _ => panic!("expected an inline response for {status}"),
        }
    }

    #[test]
    fn test_same_status_descriptions_are_merged_in_order() {
        let mappings = Mappings::builder()
            .declare(Mapping::on::<ExceptionA>(500).error_description("X"))
            .declare(Mapping::on::<ExceptionA>(500).error_description("Y"))
            .build()
            .unwrap();
        let generator = CountingGenerator::default();

        let responses = document_responses(&mappings, &generator);

        assert_eq!(responses.responses.len(), 1);
        let response = inline(&responses, "500");
        assert_eq!(response.description, "X / Y");
        assert_eq!(response.content.len(), 1);
        assert!(response.content.contains_key(PLAIN_TEXT));
        assert_eq!(generator.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_merge_order_follows_declaration_order() {
        let mappings = Mappings::builder()
            .declare(Mapping::on::<ExceptionA>(500).error_description("B"))
            .declare(Mapping::on::<Exception>(500).error_description("A"))
            .build()
            .unwrap();

        let responses = document_responses(&mappings, &InlineSchemaGenerator);
        assert_eq!(inline(&responses, "500").description, "B / A");
    }

    #[test]
    fn test_one_entry_per_status_code() {
        let mappings = Mappings::builder()
            .declare(Mapping::on::<ExceptionA>(404).error_description("missing"))
            .declare(Mapping::on::<Exception>(500))
            .declare(Mapping::on::<ExceptionA>(404))
            .build()
            .unwrap();
        let generator = CountingGenerator::default();

        let responses = document_responses(&mappings, &generator);

        assert_eq!(responses.responses.len(), 2);
        assert_eq!(
            inline(&responses, "404").description,
            "missing / No description provided"
        );
        assert_eq!(inline(&responses, "500").description, "No description provided");
        assert_eq!(generator.calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_reply_message_is_not_documentation() {
        let mappings = Mappings::builder()
            .declare(Mapping::on::<ExceptionA>(400).reply_message("bad input"))
            .build()
            .unwrap();

        let responses = document_responses(&mappings, &InlineSchemaGenerator);
        assert_eq!(inline(&responses, "400").description, "No description provided");
    }

    #[test]
    fn test_no_mappings_no_responses() {
        let generator = CountingGenerator::default();
        let responses = document_responses(&Mappings::empty(), &generator);

        assert!(responses.responses.is_empty());
        assert_eq!(generator.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_apply_tolerates_missing_inputs() {
        let mappings = Mappings::builder()
            .declare(Mapping::on::<ExceptionA>(500))
            .build()
            .unwrap();
        let generator = CountingGenerator::default();
        let context = DocumentationContext::new(&mappings, &generator);
        let mut operation = OperationBuilder::new().build();

        apply(None, Some(&context));
        apply(Some(&mut operation), None);
        apply(None, None);

        assert!(operation.responses.responses.is_empty());
        assert_eq!(generator.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_apply_appends_to_existing_response() {
        let mappings = Mappings::builder()
            .declare(Mapping::on::<ExceptionA>(500).error_description("X"))
            .build()
            .unwrap();
        let generator = CountingGenerator::default();
        let context = DocumentationContext::new(&mappings, &generator);
        let mut operation = OperationBuilder::new()
            .response(
                "500",
                RefOr::T(ResponseBuilder::new().description("Server error").build()),
            )
            .build();

        apply(Some(&mut operation), Some(&context));

        assert_eq!(
            inline(&operation.responses, "500").description,
            "Server error / X"
        );
        assert_eq!(generator.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_modify_documents_registered_operations_only() {
        let registry = HandlerRegistry::new();
        registry
            .register(
                HandlerKey::new(Method::GET, "/users/{id}"),
                Mappings::builder()
                    .declare(Mapping::on::<ExceptionA>(404).error_description("no such user"))
                    .build()
                    .unwrap(),
            )
            .unwrap();

        let mut openapi = OpenApiBuilder::new()
            .paths(
                PathsBuilder::new().path(
                    "/users/{id}",
                    PathItemBuilder::new()
                        .operation(PathItemType::Get, OperationBuilder::new().build())
                        .operation(PathItemType::Delete, OperationBuilder::new().build())
                        .build(),
                ),
            )
            .build();

        ReplyOnExceptionDocs::new(Arc::new(registry), Arc::new(InlineSchemaGenerator))
            .modify(&mut openapi);

        let item = &openapi.paths.paths["/users/{id}"];
        let get = &item.operations[&PathItemType::Get];
        assert_eq!(inline(&get.responses, "404").description, "no such user");
        assert!(item.operations[&PathItemType::Delete].responses.responses.is_empty());
    }
}
