//! Resolving reference ids into nested records.
//!
//! Population walks the relation declarations of a record and replaces each
//! bare id (or sequence of ids) with the referenced document fetched from the
//! store, recursing into the nested declarations of every joined record.
//! All references of a record are resolved before it is returned; a single
//! unresolvable reference fails the whole record.

use futures_util::future::{try_join_all, BoxFuture, FutureExt};
use serde_json::Value;
use thiserror::Error;

use crate::entity::{EntityKind, RelationPath};
use crate::storage::{document_id, Document, DocumentStore, StoreError};

/// Errors that can occur while joining relation fields.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PopulationError {
    #[error("{kind} {id} referenced by `{field}` could not be resolved")]
    Unresolved {
        kind: EntityKind,
        field: &'static str,
        id: String,
    },
    #[error("Malformed reference in `{field}`: {found}")]
    MalformedReference { field: &'static str, found: String },
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Populates every declared relation of `document`.
///
/// Fields that are absent or `null` are left untouched. A field that already
/// holds a nested record is re-fetched by its `id`, so callers always see the
/// stored state of referenced records.
pub fn populate<'a, S>(
    store: &'a S,
    mut document: Document,
    paths: &'a [RelationPath],
) -> BoxFuture<'a, Result<Document, PopulationError>>
where
    S: DocumentStore + ?Sized,
{
    async move {
        for path in paths {
            let raw = match document.get(path.field) {
                None | Some(Value::Null) => continue,
                Some(raw) => raw.clone(),
            };

            let joined = match raw {
                Value::Array(items) => {
                    let resolved =
                        try_join_all(items.into_iter().map(|item| resolve(store, path, item)))
                            .await?;
                    Value::Array(resolved)
                }
                item => resolve(store, path, item).await?,
            };

            document.insert(path.field.to_string(), joined);
        }
        Ok(document)
    }
    .boxed()
}

async fn resolve<S>(
    store: &S,
    path: &RelationPath,
    reference: Value,
) -> Result<Value, PopulationError>
where
    S: DocumentStore + ?Sized,
{
    let id = match &reference {
        Value::String(id) => id.clone(),
        Value::Object(record) => match document_id(record) {
            Some(id) => id.to_string(),
            None => return Err(malformed(path, &reference)),
        },
        _ => return Err(malformed(path, &reference)),
    };

    let target = store
        .get_document(path.target, &id)
        .await?
        .ok_or_else(|| PopulationError::Unresolved {
            kind: path.target,
            field: path.field,
            id,
        })?;

    let nested = populate(store, target, path.nested).await?;
    Ok(Value::Object(nested))
}

fn malformed(path: &RelationPath, found: &Value) -> PopulationError {
    PopulationError::MalformedReference {
        field: path.field,
        found: found.to_string(),
    }
}

/// Replaces joined records in the declared relation fields with their ids,
/// the form references take in the store. Bare ids are left as they are.
pub fn dehydrate(document: &mut Document, paths: &[RelationPath]) {
    for path in paths {
        match document.get_mut(path.field) {
            Some(Value::Array(items)) => items.iter_mut().for_each(to_reference),
            Some(value) => to_reference(value),
            None => {}
        }
    }
}

fn to_reference(value: &mut Value) {
    let id = match value {
        Value::Object(record) => document_id(record).map(str::to_string),
        _ => None,
    };
    if let Some(id) = id {
        *value = Value::String(id);
    }
}

/// Returns true if every declared relation of `document` holds nested
/// records rather than bare ids, recursively through `nested`.
pub fn is_populated(document: &Document, paths: &[RelationPath]) -> bool {
    paths.iter().all(|path| match document.get(path.field) {
        None | Some(Value::Null) => true,
        Some(Value::Array(items)) => items.iter().all(|item| is_joined(item, path)),
        Some(item) => is_joined(item, path),
    })
}

fn is_joined(value: &Value, path: &RelationPath) -> bool {
    match value {
        Value::Object(record) => is_populated(record, path.nested),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use serde_json::json;

    use crate::entity::{Chat, Entity, Grade, User};
    use crate::storage::{Rule, StoreResult};

    // Read-only mock store keyed by (kind, id)
    struct MockStore {
        documents: HashMap<(EntityKind, String), Document>,
        get_calls: AtomicUsize,
    }

    impl MockStore {
        fn new() -> Self {
            Self {
                documents: HashMap::new(),
                get_calls: AtomicUsize::new(0),
            }
        }

        fn insert(mut self, kind: EntityKind, document: Value) -> Self {
            let Value::Object(document) = document else {
                panic!("test documents must be objects");
            };
            let id = document_id(&document).unwrap().to_string();
            self.documents.insert((kind, id), document);
            self
        }
    }

    #[async_trait]
    impl DocumentStore for MockStore {
        async fn create_document(
            &self,
            _kind: EntityKind,
            _data: Document,
        ) -> StoreResult<Option<Document>> {
            Ok(None)
        }

        async fn get_all_documents(&self, _kind: EntityKind) -> StoreResult<Option<Vec<Document>>> {
            Ok(None)
        }

        async fn get_document(&self, kind: EntityKind, id: &str) -> StoreResult<Option<Document>> {
            self.get_calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.documents.get(&(kind, id.to_string())).cloned())
        }

        async fn get_documents_by_rule(
            &self,
            _kind: EntityKind,
            _rule: &Rule,
        ) -> StoreResult<Option<Vec<Document>>> {
            Ok(None)
        }

        async fn update_document(
            &self,
            _kind: EntityKind,
            _id: &str,
            _data: Document,
        ) -> StoreResult<Option<Document>> {
            Ok(None)
        }

        async fn delete_document(
            &self,
            _kind: EntityKind,
            _id: &str,
        ) -> StoreResult<Option<Document>> {
            Ok(None)
        }
    }

    fn object(value: Value) -> Document {
        match value {
            Value::Object(document) => document,
            _ => panic!("expected object"),
        }
    }

    fn school_store() -> MockStore {
        MockStore::new()
            .insert(EntityKind::School, json!({"id": "s1", "name": "Riverside"}))
            .insert(
                EntityKind::Class,
                json!({"id": "c1", "name": "5a", "gradeLevel": 5, "teachers": ["t1"], "students": ["u1"]}),
            )
            .insert(
                EntityKind::Class,
                json!({"id": "c2", "name": "5b", "gradeLevel": 5, "teachers": [], "students": []}),
            )
            .insert(EntityKind::User, json!({"id": "t1", "firstName": "Grace", "role": "teacher"}))
            .insert(EntityKind::User, json!({"id": "u1", "firstName": "Ada", "classes": ["c1"]}))
            .insert(EntityKind::Subject, json!({"id": "sub1", "name": "Mathematics"}))
            .insert(
                EntityKind::Course,
                json!({"id": "co1", "name": "Algebra", "subject": "sub1", "class": "c1", "teachers": ["t1"]}),
            )
    }

    #[tokio::test]
    async fn test_populate_single_and_many() {
        let store = school_store();
        let raw = object(json!({"id": "u1", "firstName": "Ada", "school": "s1", "classes": ["c1", "c2"]}));

        let populated = populate(&store, raw, User::RELATIONS).await.unwrap();

        assert_eq!(populated["school"]["name"], "Riverside");
        assert_eq!(populated["classes"][0]["name"], "5a");
        assert_eq!(populated["classes"][1]["name"], "5b");
        assert!(is_populated(&populated, User::RELATIONS));

        // Relations of joined records stay as ids unless declared as nested
        assert_eq!(populated["classes"][0]["students"], json!(["u1"]));

        let user: User = serde_json::from_value(Value::Object(populated)).unwrap();
        assert!(user.school.as_ref().unwrap().is_populated());
        assert!(user.classes.iter().all(|c| c.is_populated()));
    }

    #[tokio::test]
    async fn test_populate_preserves_order_of_references() {
        let store = school_store();
        let raw = object(json!({"id": "u9", "firstName": "Bo", "classes": ["c2", "c1"]}));

        let populated = populate(&store, raw, User::RELATIONS).await.unwrap();

        assert_eq!(populated["classes"][0]["id"], "c2");
        assert_eq!(populated["classes"][1]["id"], "c1");
    }

    #[tokio::test]
    async fn test_populate_nested_declarations() {
        let store = school_store();
        let raw = object(json!({
            "id": "g1", "value": 2.0, "issuedOn": "2024-03-12", "student": "u1", "course": "co1"
        }));

        let populated = populate(&store, raw, Grade::RELATIONS).await.unwrap();

        assert_eq!(populated["course"]["subject"]["name"], "Mathematics");
        // Course relations outside the nested declaration stay unjoined
        assert_eq!(populated["course"]["class"], "c1");
        assert!(is_populated(&populated, Grade::RELATIONS));

        let grade: Grade = serde_json::from_value(Value::Object(populated)).unwrap();
        let course = grade.course.record().unwrap();
        assert!(course.subject.is_populated());
        assert!(!course.school_class.is_populated());
    }

    #[tokio::test]
    async fn test_populate_empty_relations() {
        let store = school_store();
        let raw = object(json!({"id": "u4", "firstName": "Ada", "classes": []}));

        let populated = populate(&store, raw, User::RELATIONS).await.unwrap();

        assert_eq!(populated["classes"], json!([]));
        assert!(populated.get("school").is_none());
        assert!(is_populated(&populated, User::RELATIONS));
        assert_eq!(store.get_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_populate_unresolved_reference_fails_whole_record() {
        let store = school_store();
        let raw = object(json!({"id": "u1", "firstName": "Ada", "classes": ["c1", "missing"]}));

        let err = populate(&store, raw, User::RELATIONS).await.unwrap_err();

        assert_eq!(
            err,
            PopulationError::Unresolved {
                kind: EntityKind::Class,
                field: "classes",
                id: "missing".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn test_populate_malformed_reference() {
        let store = school_store();
        let raw = object(json!({"id": "u1", "firstName": "Ada", "school": 42}));

        let err = populate(&store, raw, User::RELATIONS).await.unwrap_err();

        assert!(matches!(
            err,
            PopulationError::MalformedReference { field: "school", .. }
        ));
    }

    #[tokio::test]
    async fn test_populate_refetches_already_joined_records() {
        let store = school_store();
        let raw = object(json!({
            "id": "u1", "firstName": "Ada", "school": {"id": "s1", "name": "Old Name"}
        }));

        let populated = populate(&store, raw, User::RELATIONS).await.unwrap();

        assert_eq!(populated["school"]["name"], "Riverside");
    }

    #[tokio::test]
    async fn test_populate_chat_messages_with_senders() {
        let store = school_store()
            .insert(
                EntityKind::Message,
                json!({"id": "m1", "chat": "ch1", "sender": "u1", "text": "hi", "sentAt": "2024-02-03T14:00:00Z"}),
            );
        let raw = object(json!({"id": "ch1", "kind": "group", "participants": ["u1", "t1"], "messages": ["m1"]}));

        let populated = populate(&store, raw, Chat::RELATIONS).await.unwrap();

        assert_eq!(populated["messages"][0]["sender"]["firstName"], "Ada");
        assert!(is_populated(&populated, Chat::RELATIONS));
    }

    #[tokio::test]
    async fn test_dehydrate_reverses_population() {
        let store = school_store();
        let raw = object(json!({"id": "u1", "firstName": "Ada", "school": "s1", "classes": ["c1", "c2"]}));

        let mut populated = populate(&store, raw.clone(), User::RELATIONS).await.unwrap();
        dehydrate(&mut populated, User::RELATIONS);

        assert_eq!(populated, raw);
    }

    #[test]
    fn test_dehydrate_leaves_undeclared_fields() {
        let mut document = object(json!({
            "id": "m1",
            "sender": {"id": "u1", "firstName": "Ada"},
            "poll": {"question": "Zoo?", "answers": []}
        }));

        dehydrate(&mut document, &[RelationPath::new("sender", EntityKind::User)]);

        assert_eq!(document["sender"], "u1");
        assert_eq!(document["poll"]["question"], "Zoo?");
    }

    #[test]
    fn test_is_populated_detects_bare_ids() {
        let partially = object(json!({"id": "u1", "school": {"id": "s1"}, "classes": ["c1"]}));
        assert!(!is_populated(&partially, User::RELATIONS));

        let nested_bare = object(json!({"id": "g1", "student": {"id": "u1"}, "course": {"id": "co1", "subject": "sub1"}}));
        assert!(!is_populated(&nested_bare, Grade::RELATIONS));
    }
}
