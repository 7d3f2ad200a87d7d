/// ARGB color as written into `rgb="..."` attributes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Color(String);

impl Color {
    /// Accepts `RRGGBB` or `AARRGGBB`, with or without a leading `#`.
    /// Six-digit colors get an opaque alpha channel.
    pub fn new(hex: &str) -> Self {
        let hex = hex.trim_start_matches('#').to_ascii_uppercase();
        if hex.len() == 6 {
            Color(format!("FF{hex}"))
        } else {
            Color(hex)
        }
    }

    pub(crate) fn as_argb(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::Color;

    #[test]
    fn rgb_gets_opaque_alpha() {
        assert_eq!(Color::new("d3d3d3").as_argb(), "FFD3D3D3");
        assert_eq!(Color::new("#D3D3D3").as_argb(), "FFD3D3D3");
    }

    #[test]
    fn argb_is_kept() {
        assert_eq!(Color::new("80ff0000").as_argb(), "80FF0000");
    }
}
