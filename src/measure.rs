use unicode_width::UnicodeWidthStr;

pub struct TextMetrics {
    pub char_width: f64,
    pub caption_char_width: f64,
    pub line_height: f64,
    pub caption_height: f64,
    pub padding_x: f64,
    pub padding_y: f64,
    pub min_node_width: f64,
}

impl Default for TextMetrics {
    fn default() -> Self {
        Self {
            char_width: 8.0,
            caption_char_width: 6.5,
            line_height: 20.0,
            caption_height: 14.0,
            padding_x: 14.0,
            padding_y: 8.0,
            min_node_width: 160.0,
        }
    }
}

impl TextMetrics {
    pub fn text_width(&self, text: &str) -> f64 {
        let width = UnicodeWidthStr::width(text);
        width as f64 * self.char_width
    }

    pub fn caption_width(&self, text: &str) -> f64 {
        UnicodeWidthStr::width(text) as f64 * self.caption_char_width
    }

    /// Box size for a node showing `label` with a smaller `caption` line
    /// under it. Labels are never truncated; long ones widen the box.
    pub fn node_size(&self, label: &str, caption: &str) -> (f64, f64) {
        let content_width = self.text_width(label).max(self.caption_width(caption));
        let width = (content_width + self.padding_x * 2.0).max(self.min_node_width);
        let height = self.line_height + self.caption_height + self.padding_y * 2.0;
        (width, height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ascii_width() {
        let m = TextMetrics::default();
        assert_eq!(m.text_width("orders"), 6.0 * 8.0);
    }

    #[test]
    fn test_unicode_width() {
        let m = TextMetrics::default();
        // 全角文字は幅2
        assert_eq!(m.text_width("顧客"), 4.0 * 8.0);
    }

    #[test]
    fn test_short_label_uses_min_width() {
        let m = TextMetrics::default();
        let (w, h) = m.node_size("a.b", "table");
        assert_eq!(w, m.min_node_width);
        assert_eq!(h, 20.0 + 14.0 + 16.0);
    }

    #[test]
    fn test_long_label_widens_box() {
        let m = TextMetrics::default();
        let label = "analytics.a_really_long_customer_lifetime_value_rollup";
        let (w, _) = m.node_size(label, "view");
        assert_eq!(w, m.text_width(label) + m.padding_x * 2.0);
        assert!(w > m.min_node_width);
    }

    #[test]
    fn test_height_independent_of_label() {
        let m = TextMetrics::default();
        assert_eq!(m.node_size("a", "table").1, m.node_size(&"x".repeat(80), "table").1);
    }
}
