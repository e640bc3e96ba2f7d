use std::ops::Mul;

/// Width/height pair, used for texture, table and framebuffer dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Size<T> {
    pub width: T,
    pub height: T,
}

impl<T> Size<T> {
    pub const fn new(width: T, height: T) -> Self {
        Size { width, height }
    }

    pub fn cast<U: From<T>>(self) -> Size<U> {
        Size {
            width: U::from(self.width),
            height: U::from(self.height),
        }
    }
}

impl Size<u32> {
    /// Number of cells covered (`width * height`).
    pub fn area(self) -> usize {
        self.width as usize * self.height as usize
    }

    pub fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }
}

impl<T: Mul + Copy> Mul<T> for Size<T> {
    type Output = Size<<T as Mul>::Output>;

    fn mul(self, rhs: T) -> Self::Output {
        Size {
            width: self.width * rhs,
            height: self.height * rhs,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_size_area() {
        assert_eq!(Size::new(32u32, 30).area(), 960);
        assert!(Size::new(0u32, 4).is_empty());
        assert!(!Size::new(1u32, 1).is_empty());
    }

    #[test]
    fn test_size_scale_and_cast() {
        let tiles = Size::new(16u32, 16);
        assert_eq!(tiles * 8, Size::new(128, 128));
        let wide: Size<u64> = tiles.cast();
        assert_eq!(wide.width, 16u64);
    }
}
