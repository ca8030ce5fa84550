//! Selector state: the category-grouped list and the cursor.

use clockly_tones::Catalog;

/// Heading for sounds that belong to no category.
const UNCATEGORIZED: &str = "Other";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Row {
    /// Category heading, not selectable
    Header(String),
    /// A playable sound
    Sound(String),
}

#[derive(Clone, Debug)]
pub struct SelectorState {
    rows: Vec<Row>,
    /// Row indices of the selectable entries, in display order
    sounds: Vec<usize>,
    cursor: usize,
}

impl SelectorState {
    pub fn from_catalog(catalog: &Catalog) -> Self {
        let mut rows = Vec::with_capacity(catalog.len() + catalog.categories().len() + 1);

        for category in catalog.categories() {
            rows.push(Row::Header(category.name.clone()));
            rows.extend(category.sounds.iter().cloned().map(Row::Sound));
        }

        let loose: Vec<&str> = catalog
            .names()
            .filter(|name| catalog.category_of(name).is_none())
            .collect();
        if !loose.is_empty() {
            rows.push(Row::Header(UNCATEGORIZED.to_string()));
            rows.extend(loose.into_iter().map(|name| Row::Sound(name.to_string())));
        }

        let sounds = rows
            .iter()
            .enumerate()
            .filter(|(_, row)| matches!(row, Row::Sound(_)))
            .map(|(i, _)| i)
            .collect();

        Self {
            rows,
            sounds,
            cursor: 0,
        }
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn selected_row(&self) -> Option<usize> {
        self.sounds.get(self.cursor).copied()
    }

    pub fn selected_name(&self) -> Option<&str> {
        match self.rows.get(self.selected_row()?)? {
            Row::Sound(name) => Some(name),
            Row::Header(_) => None,
        }
    }

    pub fn next(&mut self) {
        if !self.sounds.is_empty() {
            self.cursor = (self.cursor + 1) % self.sounds.len();
        }
    }

    pub fn previous(&mut self) {
        if !self.sounds.is_empty() {
            self.cursor = (self.cursor + self.sounds.len() - 1) % self.sounds.len();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clockly_tones::Segment;

    #[test]
    fn builtin_starts_on_first_classic_sound() {
        let state = SelectorState::from_catalog(&Catalog::builtin());
        assert_eq!(state.rows()[0], Row::Header("Classic".into()));
        assert_eq!(state.selected_name(), Some("Bell"));
        assert_eq!(state.selected_row(), Some(1));
    }

    #[test]
    fn cursor_skips_headers_and_wraps() {
        let mut state = SelectorState::from_catalog(&Catalog::builtin());
        for _ in 0..5 {
            state.next();
        }
        assert_eq!(state.selected_name(), Some("Pop"));

        let mut state = SelectorState::from_catalog(&Catalog::builtin());
        state.previous();
        assert_eq!(state.selected_name(), Some("Tick"));
    }

    #[test]
    fn uncategorized_sounds_get_their_own_group() {
        let catalog = Catalog::builder()
            .sound("Solo", [Segment::tone(440.0, 100.0)])
            .build()
            .unwrap();
        let state = SelectorState::from_catalog(&catalog);
        assert_eq!(
            state.rows(),
            &[Row::Header("Other".into()), Row::Sound("Solo".into())]
        );
    }
}
