use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Step {
	Create,
	Read,
	Update,
	Delete,
	CreateIndexes,
	Aggregate,
}

/// Reads after the update and delete steps show their effect.
pub const DEMO_SEQUENCE: [Step; 8] = [
	Step::Create,
	Step::Read,
	Step::Update,
	Step::Read,
	Step::Delete,
	Step::Read,
	Step::CreateIndexes,
	Step::Aggregate,
];

impl Step {
	pub fn title(&self) -> &'static str {
		match self {
			Step::Create => "CREATE DOCUMENTS",
			Step::Read => "READ DOCUMENTS",
			Step::Update => "UPDATE DOCUMENTS",
			Step::Delete => "DELETE DOCUMENTS",
			Step::CreateIndexes => "CREATE INDEXES",
			Step::Aggregate => "AGGREGATION EXAMPLES",
		}
	}
}

impl fmt::Display for Step {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.title())
	}
}
