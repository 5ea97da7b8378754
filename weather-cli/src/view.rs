use std::collections::HashMap;

use weather_core::{Node, Panel, View};

/// Terminal rendition of the page.
///
/// Output happens on visibility changes: revealing the result panel prints
/// the result block, revealing the error panel prints the error, showing the
/// loader prints a progress line.
#[derive(Debug, Default)]
pub struct TerminalView {
    input: String,
    fahrenheit: bool,
    texts: HashMap<Node, String>,
    error_text: String,
}

impl TerminalView {
    pub fn new(fahrenheit: bool) -> Self {
        Self { fahrenheit, ..Self::default() }
    }

    /// Type into the city input.
    pub fn set_input(&mut self, text: impl Into<String>) {
        self.input = text.into();
    }

    /// Flip the unit toggle and return its new state.
    pub fn flip_unit_toggle(&mut self) -> bool {
        self.fahrenheit = !self.fahrenheit;
        self.fahrenheit
    }

    pub(crate) fn text(&self, node: Node) -> &str {
        self.texts.get(&node).map(String::as_str).unwrap_or("-")
    }

    fn print_result(&self) {
        println!();
        println!("  {}", self.text(Node::Location));
        println!("  {}", self.text(Node::Description));
        println!("  Temperature: {}", self.text(Node::Temperature));
        println!("  Feels like:  {}", self.text(Node::FeelsLike));
        println!("  Humidity:    {}", self.text(Node::Humidity));
        println!("  Wind:        {}", self.text(Node::Wind));
        println!("  Icon:        {}", self.text(Node::Icon));
    }
}

impl View for TerminalView {
    fn city_input(&self) -> String {
        self.input.clone()
    }

    fn unit_toggle_checked(&self) -> bool {
        self.fahrenheit
    }

    fn set_text(&mut self, node: Node, text: &str) {
        self.texts.insert(node, text.to_string());
    }

    fn set_error_text(&mut self, text: &str) {
        self.error_text = text.to_string();
    }

    fn set_hidden(&mut self, panel: Panel, hidden: bool) {
        if hidden {
            return;
        }
        match panel {
            Panel::Result => self.print_result(),
            Panel::Error => eprintln!("{}", self.error_text),
            Panel::Loader => eprintln!("Searching for {}…", self.input.trim()),
        }
    }
}
