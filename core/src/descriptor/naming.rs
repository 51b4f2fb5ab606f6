use heck::{ToShoutySnakeCase, ToSnakeCase};

/// Case convention applied when deriving a table or column name from a Rust
/// identifier. An explicit name override always bypasses this.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CaseStyle {
    /// `accountStatus` / `AccountStatus` -> `ACCOUNT_STATUS`
    #[default]
    UpperSnake,
    /// `AccountStatus` -> `account_status`
    Snake,
    /// Use the identifier as written
    Preserve,
}

impl CaseStyle {
    pub fn apply(&self, name: &str) -> String {
        match self {
            CaseStyle::UpperSnake => name.to_shouty_snake_case(),
            CaseStyle::Snake => name.to_snake_case(),
            CaseStyle::Preserve => name.to_owned(),
        }
    }
}

/// Naming configuration for one entity: how type and field identifiers map
/// to table and column names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Naming {
    pub table: CaseStyle,
    pub column: CaseStyle,
}

impl Naming {
    pub const fn uniform(style: CaseStyle) -> Self {
        Self {
            table: style,
            column: style,
        }
    }
}
