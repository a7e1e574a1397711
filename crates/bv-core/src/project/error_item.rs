use serde::{Deserialize, Serialize};

/// Diagnostic severity reported by the build engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorLevel {
    Error,
    Warning,
    Message,
}

/// One compiler/linker diagnostic. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorItem {
    pub level: ErrorLevel,
    #[serde(default)]
    pub file: Option<String>,
    #[serde(default)]
    pub project_file: Option<String>,
    #[serde(default)]
    pub line: Option<u32>,
    #[serde(default)]
    pub column: Option<u32>,
    #[serde(default)]
    pub code: Option<String>,
    pub text: String,
}

impl ErrorItem {
    pub fn new(level: ErrorLevel, text: impl Into<String>) -> Self {
        Self {
            level,
            file: None,
            project_file: None,
            line: None,
            column: None,
            code: None,
            text: text.into(),
        }
    }

    pub fn with_file(mut self, file: impl Into<String>) -> Self {
        self.file = Some(file.into());
        self
    }

    pub fn with_project_file(mut self, project_file: impl Into<String>) -> Self {
        self.project_file = Some(project_file.into());
        self
    }

    pub fn with_position(mut self, line: u32, column: u32) -> Self {
        self.line = Some(line);
        self.column = Some(column);
        self
    }

    /// Whether the diagnostic carries enough location data to be navigated to.
    pub fn is_navigable(&self) -> bool {
        let non_empty = |v: &Option<String>| v.as_deref().is_some_and(|s| !s.is_empty());
        non_empty(&self.file) && non_empty(&self.project_file)
    }
}

/// Ordered collection of diagnostics produced by one project build.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ErrorsBox {
    items: Vec<ErrorItem>,
}

impl ErrorsBox {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, item: ErrorItem) {
        self.items.push(item);
    }

    pub fn all(&self) -> &[ErrorItem] {
        &self.items
    }

    pub fn errors(&self) -> impl Iterator<Item = &ErrorItem> {
        self.of_level(ErrorLevel::Error)
    }

    pub fn of_level(&self, level: ErrorLevel) -> impl Iterator<Item = &ErrorItem> {
        self.items.iter().filter(move |item| item.level == level)
    }

    pub fn count(&self, level: ErrorLevel) -> usize {
        self.of_level(level).count()
    }

    pub fn error_count(&self) -> usize {
        self.count(ErrorLevel::Error)
    }

    pub fn warning_count(&self) -> usize {
        self.count(ErrorLevel::Warning)
    }

    pub fn message_count(&self) -> usize {
        self.count(ErrorLevel::Message)
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl FromIterator<ErrorItem> for ErrorsBox {
    fn from_iter<T: IntoIterator<Item = ErrorItem>>(iter: T) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn errors_box_counts_by_level_and_keeps_order() {
        let errors: ErrorsBox = vec![
            ErrorItem::new(ErrorLevel::Warning, "w1"),
            ErrorItem::new(ErrorLevel::Error, "e1"),
            ErrorItem::new(ErrorLevel::Message, "m1"),
            ErrorItem::new(ErrorLevel::Error, "e2"),
        ]
        .into_iter()
        .collect();

        assert_eq!(errors.error_count(), 2);
        assert_eq!(errors.warning_count(), 1);
        assert_eq!(errors.message_count(), 1);
        let texts: Vec<_> = errors.errors().map(|e| e.text.as_str()).collect();
        assert_eq!(texts, vec!["e1", "e2"]);
    }

    #[test]
    fn error_item_without_file_or_project_is_not_navigable() {
        let bare = ErrorItem::new(ErrorLevel::Error, "boom");
        assert!(!bare.is_navigable());

        let no_project = bare.clone().with_file("main.c");
        assert!(!no_project.is_navigable());

        let empty_file = bare.clone().with_file("").with_project_file("app.vcxproj");
        assert!(!empty_file.is_navigable());

        let full = bare.with_file("main.c").with_project_file("app.vcxproj");
        assert!(full.is_navigable());
    }
}
