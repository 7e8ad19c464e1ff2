pub type Result<T> = std::result::Result<T, Error>;

/// Failures raised while turning a record set into a tree.
///
/// The structural variants are only produced by [`crate::tree::build`]; once a
/// tree exists, layout and rendering cannot fail.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("expected exactly one root record (empty parent), found {}: [{}]", roots.len(), roots.join(", "))]
    MissingRoot { roots: Vec<String> },

    #[error("duplicate record id `{id}` (rows {first} and {second})")]
    DuplicateId {
        id: String,
        first: usize,
        second: usize,
    },

    #[error("record `{id}` names parent `{parent}`, which is not a known id")]
    DanglingParent { id: String, parent: String },

    #[error("records never reach the root (cyclic parent chain): [{}]", ids.join(", "))]
    CyclicParent { ids: Vec<String> },

    #[error("invalid compact-tier label pattern `{pattern}`: {message}")]
    InvalidTierPattern { pattern: String, message: String },

    #[error("could not decode records: {message}")]
    Input { message: String },
}
