use flock_shared::Position;

/// Lengths at or below this are treated as zero
pub const EPSILON: f32 = 1.0e-6;

/// A 2D vector used for position, velocity and steering forces
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vector2D {
    pub x: f32,
    pub y: f32,
}

impl Vector2D {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub const fn zero() -> Self {
        Self { x: 0.0, y: 0.0 }
    }

    pub fn magnitude_squared(&self) -> f32 {
        self.x * self.x + self.y * self.y
    }

    pub fn magnitude(&self) -> f32 {
        self.magnitude_squared().sqrt()
    }

    pub fn is_zero(&self) -> bool {
        self.magnitude_squared() <= EPSILON * EPSILON
    }

    /// Unit vector in the same direction, or zero for a zero-length input.
    pub fn normalize(&self) -> Self {
        let mag = self.magnitude();
        if mag > 0.0 {
            Self {
                x: self.x / mag,
                y: self.y / mag,
            }
        } else {
            Self::zero()
        }
    }

    /// Rescales to exactly `length`. A zero vector has no direction and stays zero.
    pub fn with_magnitude(&self, length: f32) -> Self {
        self.normalize() * length
    }

    /// Clamps the length to `max`, leaving shorter vectors untouched.
    pub fn limit(&self, max: f32) -> Self {
        if self.magnitude_squared() <= max * max {
            *self
        } else {
            self.with_magnitude(max)
        }
    }

    pub fn distance(&self, other: &Vector2D) -> f32 {
        (*self - *other).magnitude()
    }

    /// Direction angle in radians, `0` for the zero vector
    pub fn heading(&self) -> f32 {
        if self.is_zero() {
            0.0
        } else {
            self.y.atan2(self.x)
        }
    }

    pub fn from_angle(angle: f32) -> Self {
        Self::new(angle.cos(), angle.sin())
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl core::ops::Add for Vector2D {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self {
            x: self.x + other.x,
            y: self.y + other.y,
        }
    }
}

impl core::ops::Sub for Vector2D {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self {
            x: self.x - other.x,
            y: self.y - other.y,
        }
    }
}

impl core::ops::Mul<f32> for Vector2D {
    type Output = Self;

    fn mul(self, scalar: f32) -> Self {
        Self {
            x: self.x * scalar,
            y: self.y * scalar,
        }
    }
}

impl core::ops::Div<f32> for Vector2D {
    type Output = Self;

    fn div(self, scalar: f32) -> Self {
        Self {
            x: self.x / scalar,
            y: self.y / scalar,
        }
    }
}

impl core::ops::AddAssign for Vector2D {
    fn add_assign(&mut self, other: Self) {
        self.x += other.x;
        self.y += other.y;
    }
}

impl core::ops::SubAssign for Vector2D {
    fn sub_assign(&mut self, other: Self) {
        self.x -= other.x;
        self.y -= other.y;
    }
}

impl core::ops::MulAssign<f32> for Vector2D {
    fn mul_assign(&mut self, scalar: f32) {
        self.x *= scalar;
        self.y *= scalar;
    }
}

impl From<Position> for Vector2D {
    fn from(position: Position) -> Self {
        Self::new(position.x, position.y)
    }
}

impl From<Vector2D> for Position {
    fn from(vector: Vector2D) -> Self {
        Position::new(vector.x, vector.y)
    }
}

/// Clamps `n` into `[low, high]`. Callers guarantee `low <= high`.
pub fn constrain(n: f32, low: f32, high: f32) -> f32 {
    n.min(high).max(low)
}

/// Linearly maps `n` from `[start1, stop1]` onto `[start2, stop2]` and clamps
/// the result to the target range, whichever way round it is given.
///
/// A degenerate source range maps everything to `start2`.
pub fn remap(n: f32, start1: f32, stop1: f32, start2: f32, stop2: f32) -> f32 {
    let span = stop1 - start1;
    if span.abs() <= f32::EPSILON {
        return start2;
    }
    let value = (n - start1) / span * (stop2 - start2) + start2;
    if start2 < stop2 {
        constrain(value, start2, stop2)
    } else {
        constrain(value, stop2, start2)
    }
}
