//! Component trait.

/// Renderable component interface.
pub trait Component {
    /// Render to a list of lines at the given width.
    fn render(&mut self, width: usize) -> Vec<String>;

    /// Invalidate any cached state.
    fn invalidate(&mut self) {}
}

impl<T: Component + ?Sized> Component for Box<T> {
    fn render(&mut self, width: usize) -> Vec<String> {
        (**self).render(width)
    }

    fn invalidate(&mut self) {
        (**self).invalidate();
    }
}
