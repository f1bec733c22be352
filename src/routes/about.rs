use crate::app::{App, Page};

pub fn show(app: &mut App) {
    app.set_active_page(Some(Page::About));
}
