//! The page surface the controller reads from and writes to.

/// Result sub-fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Node {
    /// Holds the icon URL rather than text.
    Icon,
    Location,
    Description,
    Temperature,
    FeelsLike,
    Humidity,
    Wind,
}

/// Containers with show/hide state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Panel {
    Result,
    Error,
    Loader,
}

pub trait View {
    /// Current text of the city input.
    fn city_input(&self) -> String;

    fn unit_toggle_checked(&self) -> bool;

    fn set_text(&mut self, node: Node, text: &str);

    fn set_error_text(&mut self, text: &str);

    fn set_hidden(&mut self, panel: Panel, hidden: bool);
}
