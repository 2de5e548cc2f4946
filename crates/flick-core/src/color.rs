/// RGBA color representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    pub const WHITE: Color = Color::rgb(255, 255, 255);
    /// Idle ring around coins.
    pub const GOLD: Color = Color::rgb(255, 200, 40);
    /// Idle ring around the goal.
    pub const TEAL: Color = Color::rgb(40, 200, 180);
    pub const SPIKE: Color = Color::rgb(220, 60, 60);
    /// Aim indicator.
    pub const AIM: Color = Color::rgb(230, 230, 230);
}
