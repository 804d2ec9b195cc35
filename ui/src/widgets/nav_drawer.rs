//! Navigation drawer listing the configured pages.

use egui::{RichText, Ui};

use crate::theme::Theme;

/// Renders one entry per page title and highlights `active`.
///
/// Returns the index of a newly selected page.
pub fn nav_drawer(ui: &mut Ui, theme: &Theme, titles: &[&str], active: usize) -> Option<usize> {
    let mut selected = None;

    ui.vertical(|ui| {
        ui.label(RichText::new("Pages").strong().color(theme.muted));
        ui.add_space(theme.spacing);

        for (index, title) in titles.iter().enumerate() {
            let is_active = index == active;
            let text = if is_active {
                RichText::new(*title).color(theme.accent).strong()
            } else {
                RichText::new(*title)
            };
            if ui.selectable_label(is_active, text).clicked() && !is_active {
                selected = Some(index);
            }
        }
    });

    selected
}

#[cfg(test)]
mod nav_drawer_test {
    use super::*;
    use egui_kittest::Harness;
    use kittest::Queryable;

    #[derive(Default)]
    struct NavState {
        active: usize,
    }

    fn harness<'a>() -> Harness<'a, NavState> {
        Harness::new_ui_state(
            |ui, state: &mut NavState| {
                if let Some(index) =
                    nav_drawer(ui, &Theme::default(), &["Users", "Posts"], state.active)
                {
                    state.active = index;
                }
            },
            NavState::default(),
        )
    }

    #[test]
    fn test_lists_every_page() {
        let mut harness = harness();
        harness.step();

        assert!(harness.query_by_label("Users").is_some());
        assert!(harness.query_by_label("Posts").is_some());
    }

    #[test]
    fn test_selecting_page_switches_active() {
        let mut harness = harness();
        harness.step();

        harness.get_by_label("Posts").click();
        harness.step();
        assert_eq!(harness.state().active, 1);

        // Clicking the active entry is not a navigation.
        harness.get_by_label("Posts").click();
        harness.step();
        assert_eq!(harness.state().active, 1);
    }
}
