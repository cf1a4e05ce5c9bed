//! Hand-off between the structured query builder and the draft editor.
//!
//! The builder is an external flow that, given the class and its fields,
//! produces a finished constraint string. Its output is written into the
//! draft untouched.

use crate::editor::QueryEditorState;

/// What the structured builder is started with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuilderRequest {
    /// Class the query targets
    pub class_name: String,
    /// Fields the builder may offer, in schema order
    pub fields: Vec<String>,
}

/// An external structured query builder.
pub trait QueryBuilder {
    /// Run the builder. `None` means the user backed out without a result.
    fn build(&self, request: &BuilderRequest) -> Option<String>;
}

impl<F> QueryBuilder for F
where
    F: Fn(&BuilderRequest) -> Option<String>,
{
    fn build(&self, request: &BuilderRequest) -> Option<String> {
        self(request)
    }
}

/// Routes builder output into a [`QueryEditorState`].
#[derive(Debug, Clone, Copy, Default)]
pub struct QueryBuilderBridge;

impl QueryBuilderBridge {
    /// Build the request for a builder session.
    #[must_use]
    pub fn request(class_name: &str, fields: &[String]) -> BuilderRequest {
        BuilderRequest {
            class_name: class_name.to_string(),
            fields: fields.to_vec(),
        }
    }

    /// Write a finished builder result into the draft.
    pub fn deliver(editor: &mut QueryEditorState, text: impl Into<String>) {
        editor.apply_builder_result(text);
    }

    /// Run `builder` and deliver its result, if any.
    ///
    /// Returns `true` if the draft changed.
    pub fn run(
        builder: &dyn QueryBuilder,
        request: &BuilderRequest,
        editor: &mut QueryEditorState,
    ) -> bool {
        match builder.build(request) {
            Some(text) => {
                Self::deliver(editor, text);
                true
            }
            None => {
                tracing::debug!(class = %request.class_name, "Query builder cancelled");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deliver_is_verbatim() {
        let mut editor = QueryEditorState::new("", "score");
        QueryBuilderBridge::deliver(&mut editor, "  score>10 & limit=5  ");
        assert_eq!(editor.draft_query(), "  score>10 & limit=5  ");
        assert_eq!(editor.search_key(), "score");
    }

    #[test]
    fn run_passes_fields_to_builder() {
        let fields = vec!["name".to_string(), "score".to_string()];
        let request = QueryBuilderBridge::request("GameScore", &fields);
        let builder = |req: &BuilderRequest| Some(format!("{}>0", req.fields[1]));
        let mut editor = QueryEditorState::new("old", "objectId");

        assert!(QueryBuilderBridge::run(&builder, &request, &mut editor));
        assert_eq!(editor.draft_query(), "score>0");
    }

    #[test]
    fn cancelled_builder_leaves_draft() {
        let request = QueryBuilderBridge::request("GameScore", &[]);
        let builder = |_: &BuilderRequest| -> Option<String> { None };
        let mut editor = QueryEditorState::new("old", "objectId");

        assert!(!QueryBuilderBridge::run(&builder, &request, &mut editor));
        assert_eq!(editor.draft_query(), "old");
    }
}
