/// Literal token separating the meal plan from the shopping list.
pub const SEPARATOR: &str = "---SHOPPING LIST---";

/// Text received so far in one session, plus where the shopping list starts.
///
/// The buffer only grows. The split point is fixed the first time the
/// separator shows up and never moves afterwards.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct StreamBuffer {
    accumulated: String,
    split_index: Option<usize>,
}

impl StreamBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a chunk and look for the separator if it has not been seen yet.
    ///
    /// Only the tail of the previous text that could still hold the start of
    /// a separator is rescanned, so each push costs `O(chunk)`.
    pub fn push(&mut self, chunk: &str) {
        if chunk.is_empty() {
            return;
        }

        let mut scan_from = self
            .accumulated
            .len()
            .saturating_sub(SEPARATOR.len() - 1);
        while !self.accumulated.is_char_boundary(scan_from) {
            scan_from -= 1;
        }

        self.accumulated.push_str(chunk);

        if self.split_index.is_none() {
            self.split_index = self.accumulated[scan_from..]
                .find(SEPARATOR)
                .map(|pos| scan_from + pos);

            if let Some(index) = self.split_index {
                tracing::debug!(index, "Shopping list separator found");
            }
        }
    }

    pub fn reset(&mut self) {
        self.accumulated.clear();
        self.split_index = None;
    }

    pub fn text(&self) -> &str {
        &self.accumulated
    }

    pub fn split_index(&self) -> Option<usize> {
        self.split_index
    }

    pub fn is_empty(&self) -> bool {
        self.accumulated.is_empty()
    }

    /// Everything before the separator, or the whole buffer if none was seen.
    pub fn meal_plan(&self) -> &str {
        match self.split_index {
            Some(index) => &self.accumulated[..index],
            None => &self.accumulated,
        }
    }

    /// Everything after the separator, empty until it has been seen.
    pub fn shopping_list(&self) -> &str {
        match self.split_index {
            Some(index) => &self.accumulated[index + SEPARATOR.len()..],
            None => "",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn buffer_from(chunks: &[&str]) -> StreamBuffer {
        let mut buffer = StreamBuffer::new();
        for chunk in chunks {
            buffer.push(chunk);
        }
        buffer
    }

    #[test]
    fn splits_on_separator() {
        let buffer = buffer_from(&["Plan text---SHOPPING LIST---List text"]);

        assert_eq!(buffer.meal_plan(), "Plan text");
        assert_eq!(buffer.shopping_list(), "List text");
        assert_eq!(buffer.split_index(), Some(9));
    }

    #[test]
    fn without_separator_everything_is_meal_plan() {
        let buffer = buffer_from(&["## Day 1\n", "* oats\n"]);

        assert_eq!(buffer.meal_plan(), "## Day 1\n* oats\n");
        assert_eq!(buffer.shopping_list(), "");
        assert_eq!(buffer.split_index(), None);
    }

    #[test]
    fn separator_split_across_chunks() {
        let buffer = buffer_from(&["Plan ---SHOP", "PING LI", "ST---", "List"]);

        assert_eq!(buffer.meal_plan(), "Plan ");
        assert_eq!(buffer.shopping_list(), "List");
    }

    #[test]
    fn first_separator_wins() {
        let buffer = buffer_from(&[
            "A---SHOPPING LIST---B",
            "---SHOPPING LIST---C",
        ]);

        assert_eq!(buffer.meal_plan(), "A");
        assert_eq!(buffer.shopping_list(), "B---SHOPPING LIST---C");
    }

    #[test]
    fn sections_track_growth_after_split() {
        let mut buffer = buffer_from(&["Plan---SHOPPING LIST---"]);
        assert_eq!(buffer.shopping_list(), "");

        buffer.push("* 1 litre oat milk");
        assert_eq!(buffer.meal_plan(), "Plan");
        assert_eq!(buffer.shopping_list(), "* 1 litre oat milk");
    }

    #[test]
    fn multibyte_text_before_separator() {
        let buffer = buffer_from(&["Crème fraîche — 200g", "---SHOPPING LIST---", "€"]);

        assert_eq!(buffer.meal_plan(), "Crème fraîche — 200g");
        assert_eq!(buffer.shopping_list(), "€");
    }

    #[test]
    fn reset_clears_text_and_split() {
        let mut buffer = buffer_from(&["a---SHOPPING LIST---b"]);
        buffer.reset();

        assert!(buffer.is_empty());
        assert_eq!(buffer.split_index(), None);
        assert_eq!(buffer.meal_plan(), "");
    }
}
