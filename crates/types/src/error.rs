/// Class registration failures. All of them are wiring defects.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TypeError {
	#[error("class name is empty")]
	EmptyName,
	#[error("class name `{0}` has no `::` namespace separator")]
	MissingNamespace(String),
	#[error("class `{0}` names a parent that is not registered")]
	BadParent(String),
	#[error("class `{name}` is already registered under `{registered}`, not `{requested}`")]
	IncompatibleDuplicate {
		name: String,
		registered: &'static str,
		requested: &'static str,
	},
	#[error("class table is full")]
	TableFull,
}

/// Failures while storing or restoring a container.
#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
	#[error("cannot decode `{name}` as {type_tag}: {reason}")]
	Decode {
		name: String,
		type_tag: String,
		reason: String,
	},
	#[error("element stream encoding failed: {0}")]
	Stream(#[from] postcard::Error),
	#[error("restore of `{name}` rejected: {reason}")]
	Rejected { name: String, reason: String },
	#[error("{0}")]
	Property(String),
}
