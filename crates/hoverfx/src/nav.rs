//! Navigation links and pointer hover tracking.

use hoverfx_config::LinksConfig;
use hoverfx_core::EffectKind;
use ratatui::{layout::Rect, text::Span};

/// Columns between two links.
const GAP: u16 = 3;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavLink {
    pub label: String,
    /// Animation played while the link is hovered.
    pub effect: Option<EffectKind>,
    /// Screen cells the label occupies after [`NavBar::layout`].
    pub area: Rect,
}

/// A single row of links, centred.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavBar {
    links: Vec<NavLink>,
}

impl NavBar {
    pub fn new(labels: &LinksConfig) -> Self {
        let link = |label: &str, effect| NavLink {
            label: label.to_string(),
            effect,
            area: Rect::default(),
        };
        Self {
            links: vec![
                link(&labels.work, Some(EffectKind::Ticker)),
                link(&labels.mind, Some(EffectKind::Cosmos)),
                link(&labels.about, None),
            ],
        }
    }

    pub fn links(&self) -> &[NavLink] {
        &self.links
    }

    pub fn link(&self, index: usize) -> Option<&NavLink> {
        self.links.get(index)
    }

    /// Centre the links on the first row of `area`.
    pub fn layout(&mut self, area: Rect) {
        let widths: Vec<u16> = self
            .links
            .iter()
            .map(|link| u16::try_from(Span::raw(link.label.as_str()).width()).unwrap_or(u16::MAX))
            .collect();
        let gaps = GAP.saturating_mul(u16::try_from(widths.len().saturating_sub(1)).unwrap_or(0));
        let total = widths.iter().fold(gaps, |sum, w| sum.saturating_add(*w));

        let mut x = area.x.saturating_add(area.width.saturating_sub(total) / 2);
        let right = area.right();
        for (link, width) in self.links.iter_mut().zip(widths) {
            let visible = width.min(right.saturating_sub(x));
            link.area = Rect::new(x, area.y, visible, area.height.min(1));
            x = x.saturating_add(width).saturating_add(GAP);
        }
    }

    /// Index of the link under a cell.
    pub fn hit(&self, col: u16, row: u16) -> Option<usize> {
        self.links.iter().position(|link| {
            let area = link.area;
            col >= area.x && col < area.right() && row >= area.y && row < area.bottom()
        })
    }
}

/// Pointer transition over the links.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HoverEvent {
    Enter(usize),
    Leave(usize),
}

/// Turns pointer positions into enter and leave transitions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HoverTracker {
    current: Option<usize>,
}

impl HoverTracker {
    pub fn current(&self) -> Option<usize> {
        self.current
    }

    /// Record the link now under the pointer, if any.
    pub fn update(&mut self, hit: Option<usize>) -> Vec<HoverEvent> {
        if hit == self.current {
            return Vec::new();
        }
        let mut events = Vec::with_capacity(2);
        if let Some(previous) = self.current {
            events.push(HoverEvent::Leave(previous));
        }
        if let Some(next) = hit {
            events.push(HoverEvent::Enter(next));
        }
        self.current = hit;
        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nav() -> NavBar {
        let mut nav = NavBar::new(&LinksConfig::default());
        nav.layout(Rect::new(0, 5, 40, 1));
        nav
    }

    #[test]
    fn test_links_map_to_effects() {
        let nav = nav();
        let effects: Vec<_> = nav.links().iter().map(|l| l.effect).collect();
        assert_eq!(
            effects,
            vec![Some(EffectKind::Ticker), Some(EffectKind::Cosmos), None]
        );
        assert_eq!(nav.link(1).map(|l| l.label.as_str()), Some("mind"));
        assert!(nav.link(3).is_none());
    }

    #[test]
    fn test_layout_centres_links() {
        let nav = nav();
        // 4 + 3 + 4 + 3 + 5 = 19 columns, centred in 40
        assert_eq!(nav.links()[0].area, Rect::new(10, 5, 4, 1));
        assert_eq!(nav.links()[1].area, Rect::new(17, 5, 4, 1));
        assert_eq!(nav.links()[2].area, Rect::new(24, 5, 5, 1));
    }

    #[test]
    fn test_hit() {
        let nav = nav();
        assert_eq!(nav.hit(10, 5), Some(0));
        assert_eq!(nav.hit(13, 5), Some(0));
        assert_eq!(nav.hit(14, 5), None);
        assert_eq!(nav.hit(17, 5), Some(1));
        assert_eq!(nav.hit(28, 5), Some(2));
        assert_eq!(nav.hit(10, 4), None);
        assert_eq!(nav.hit(10, 6), None);
    }

    #[test]
    fn test_narrow_layout_clips() {
        let mut nav = NavBar::new(&LinksConfig::default());
        nav.layout(Rect::new(0, 0, 10, 1));
        assert_eq!(nav.links()[0].area, Rect::new(0, 0, 4, 1));
        assert_eq!(nav.links()[1].area.width, 3);
        assert_eq!(nav.links()[2].area.width, 0);
        assert_eq!(nav.hit(9, 0), Some(1));
    }

    #[test]
    fn test_hover_transitions() {
        let mut hover = HoverTracker::default();
        assert!(hover.update(None).is_empty());
        assert_eq!(hover.update(Some(0)), vec![HoverEvent::Enter(0)]);
        assert!(hover.update(Some(0)).is_empty());
        assert_eq!(
            hover.update(Some(1)),
            vec![HoverEvent::Leave(0), HoverEvent::Enter(1)]
        );
        assert_eq!(hover.current(), Some(1));
        assert_eq!(hover.update(None), vec![HoverEvent::Leave(1)]);
        assert_eq!(hover.current(), None);
    }
}
