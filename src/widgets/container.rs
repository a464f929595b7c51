//! Vertical container widget.

use crate::component::Component;

/// Stacks children top to bottom, optionally separated by blank lines.
#[derive(Default)]
pub struct Container {
    children: Vec<Box<dyn Component>>,
    gap: usize,
}

impl Container {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_gap(gap: usize) -> Self {
        Self {
            children: Vec::new(),
            gap,
        }
    }

    pub fn add_child(&mut self, component: Box<dyn Component>) {
        self.children.push(component);
    }
}

impl Component for Container {
    fn render(&mut self, width: usize) -> Vec<String> {
        let mut lines = Vec::new();
        for (index, child) in self.children.iter_mut().enumerate() {
            if index > 0 {
                lines.extend(std::iter::repeat(String::new()).take(self.gap));
            }
            lines.extend(child.render(width));
        }
        lines
    }

    fn invalidate(&mut self) {
        for child in self.children.iter_mut() {
            child.invalidate();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Container;
    use crate::component::Component;

    struct StaticComponent {
        lines: Vec<String>,
    }

    impl Component for StaticComponent {
        fn render(&mut self, _width: usize) -> Vec<String> {
            self.lines.clone()
        }
    }

    fn static_child(lines: &[&str]) -> Box<dyn Component> {
        Box::new(StaticComponent {
            lines: lines.iter().map(|line| line.to_string()).collect(),
        })
    }

    #[test]
    fn container_concatenates_children() {
        let mut container = Container::new();
        container.add_child(static_child(&["one"]));
        container.add_child(static_child(&["two", "three"]));

        assert_eq!(container.render(10), vec!["one", "two", "three"]);
    }

    #[test]
    fn container_gap_separates_children_only() {
        let mut container = Container::with_gap(1);
        container.add_child(static_child(&["a"]));
        container.add_child(static_child(&["b"]));

        assert_eq!(container.render(10), vec!["a", "", "b"]);
    }
}
