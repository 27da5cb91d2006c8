//! Glyph constants for the animations.

/// Sub-cell specks, from faintest to largest.
pub const SPECK_CHARS: &[char] = &['.', '·', '•'];

/// Round stars by apparent radius.
pub const ROUND_STAR_CHARS: &[char] = &['·', '•', '●'];

/// Spiked stars, cycled by rotation.
pub const SPIKED_STAR_CHARS: &[char] = &['✦', '✧', '✶', '✷'];

/// Thin line segments: horizontal, vertical, rising, falling.
pub const THIN_LINE_CHARS: [char; 4] = ['─', '│', '╱', '╲'];

/// Heavy line segments: horizontal, vertical, rising, falling.
pub const HEAVY_LINE_CHARS: [char; 4] = ['━', '┃', '╱', '╲'];

/// Leading dot of the ticker line.
pub const HEAD_CHAR: char = '●';

/// Faux code shown by the ticker's typewriter readouts.
pub const CODE_SNIPPETS: &[&str] = &[
    "let ret = close / open - 1.0;",
    "vol = returns.std() * 252f64.sqrt()",
    "sharpe = (mu - rf) / sigma",
    "book.rebalance(&weights)?;",
    "fn alpha(p: &Portfolio) -> f64",
    "cagr = (end / start).powf(1.0 / yrs) - 1.0",
    "if drawdown > limit { hedge(); }",
    "ticks.windows(2).map(|w| w[1] - w[0])",
];
