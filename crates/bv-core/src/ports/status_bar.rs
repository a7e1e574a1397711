/// Host status bar.
pub trait StatusBarPort: Send + Sync {
    fn set_text(&self, text: &str);
    /// A frozen status bar keeps its text until unfrozen.
    fn freeze(&self, frozen: bool);
}
