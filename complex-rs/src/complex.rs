#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Complex {
    pub re: f64,
    pub im: f64,
}

impl Complex {
    pub const ZERO: Complex = Complex { re: 0.0, im: 0.0 };

    pub fn new(re: f64, im: f64) -> Self {
        Self { re, im }
    }

    /// Squared modulus, |z|².
    pub fn arg_sq(self) -> f64 {
        self.re * self.re + self.im * self.im
    }

    pub fn square(self) -> Self {
        Self {
            re: self.re * self.re - self.im * self.im,
            im: 2.0 * self.re * self.im,
        }
    }
}

impl std::ops::Add for Complex {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self {
            re: self.re + rhs.re,
            im: self.im + rhs.im,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn square_expands_real_and_imaginary_parts() {
        // (1 + 2i)² = -3 + 4i
        assert_eq!(Complex::new(1.0, 2.0).square(), Complex::new(-3.0, 4.0));
    }

    #[test]
    fn i_squared_is_minus_one() {
        let i = Complex::new(0.0, 1.0);
        assert_eq!(i.square(), Complex::new(-1.0, 0.0));
    }

    #[test]
    fn add_is_componentwise() {
        assert_eq!(
            Complex::new(0.5, -1.0) + Complex::new(-0.25, 3.0),
            Complex::new(0.25, 2.0)
        );
    }

    #[test]
    fn arg_sq_is_squared_modulus() {
        assert_eq!(Complex::new(3.0, 4.0).arg_sq(), 25.0);
        assert_eq!(Complex::ZERO.arg_sq(), 0.0);
    }
}
