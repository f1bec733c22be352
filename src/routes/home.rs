use crate::app::{App, Page};

/// Shows the landing page.
pub fn show(app: &mut App) {
    app.set_active_page(Some(Page::Home));
}
