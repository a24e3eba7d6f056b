use serde::{Deserialize, Serialize};
use std::ops;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct V3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

/// Screen-space coordinate, centered on the image and scaled by its height.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct V2 {
    pub x: f64,
    pub y: f64,
}

impl V2 {
    pub fn floor(self) -> V2 {
        V2 {
            x: self.x.floor(),
            y: self.y.floor(),
        }
    }

    pub fn length(self) -> f64 {
        (self.x * self.x + self.y * self.y).sqrt()
    }
}

pub fn v2(x: f64, y: f64) -> V2 {
    V2 { x, y }
}

pub fn sub(x: &V3, y: &V3) -> V3 {
    V3 {
        x: x.x - y.x,
        y: x.y - y.y,
        z: x.z - y.z,
    }
}

pub fn abs2(x: &V3) -> f64 {
    x.x * x.x + x.y * x.y + x.z * x.z
}

pub fn abs(x: &V3) -> f64 {
    abs2(x).sqrt()
}
pub fn v(x: f64, y: f64, z: f64) -> V3 {
    V3 { x, y, z }
}
pub fn mul(scalar: f64, x: &V3) -> V3 {
    V3 {
        x: x.x * scalar,
        y: x.y * scalar,
        z: x.z * scalar,
    }
}

pub fn add(x: &V3, y: &V3) -> V3 {
    V3 {
        x: x.x + y.x,
        y: x.y + y.y,
        z: x.z + y.z,
    }
}

pub fn dist(x: &V3, y: &V3) -> f64 {
    abs(&sub(x, y))
}

pub fn normalize(x: &V3) -> V3 {
    mul(1. / abs(x), x)
}

pub fn dot(x: &V3, y: &V3) -> f64 {
    x.x * y.x + x.y * y.y + x.z * y.z
}

pub fn cross(v1: &V3, v2: &V3) -> V3 {
    v(
        v1.y * v2.z - v1.z * v2.y,
        v1.z * v2.x - v1.x * v2.z,
        v1.x * v2.y - v1.y * v2.x,
    )
}

/// Mirror `i` about the plane with normal `n` (GLSL `reflect`).
pub fn reflect(i: &V3, n: &V3) -> V3 {
    sub(i, &mul(2. * dot(n, i), n))
}

pub fn mix(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

pub fn mix3(a: &V3, b: &V3, t: f64) -> V3 {
    add(a, &mul(t, &sub(b, a)))
}

pub fn clamp01(x: f64) -> f64 {
    x.clamp(0., 1.)
}

pub fn clamp3(x: &V3, lo: f64, hi: f64) -> V3 {
    v(x.x.clamp(lo, hi), x.y.clamp(lo, hi), x.z.clamp(lo, hi))
}

pub fn powf3(x: &V3, e: f64) -> V3 {
    v(x.x.powf(e), x.y.powf(e), x.z.powf(e))
}

/// Hermite step between `edge0` and `edge1`. A reversed edge pair gives a
/// falling step, which the background cells rely on.
pub fn smoothstep(edge0: f64, edge1: f64, x: f64) -> f64 {
    let t = clamp01((x - edge0) / (edge1 - edge0));
    t * t * (3. - 2. * t)
}

pub fn fract(x: f64) -> f64 {
    x - x.floor()
}

/// Floored modulo, the sign follows `y`.
pub fn modulo(x: f64, y: f64) -> f64 {
    x - y * (x / y).floor()
}

pub fn is_finite3(x: &V3) -> bool {
    x.x.is_finite() && x.y.is_finite() && x.z.is_finite()
}

impl ops::Add<V3> for V3 {
    type Output = V3;

    fn add(self, rhs: V3) -> V3 {
        return add(&self, &rhs)
    }
}

impl ops::Sub<V3> for V3 {
    type Output = V3;

    fn sub(self, rhs: V3) -> V3 {
        return sub(&self, &rhs)
    }
}

impl ops::Neg for V3 {
    type Output = V3;

    fn neg(self) -> V3 {
        return mul(-1., &self)
    }
}

impl ops::Mul<V3> for f64 {
    type Output = V3;

    fn mul(self, rhs: V3) -> Self::Output {
        return mul(self, &rhs)
    }
}

impl ops::Add<V2> for V2 {
    type Output = V2;

    fn add(self, rhs: V2) -> V2 {
        return v2(self.x + rhs.x, self.y + rhs.y)
    }
}

impl ops::Sub<V2> for V2 {
    type Output = V2;

    fn sub(self, rhs: V2) -> V2 {
        return v2(self.x - rhs.x, self.y - rhs.y)
    }
}

impl ops::Mul<V2> for f64 {
    type Output = V2;

    fn mul(self, rhs: V2) -> V2 {
        return v2(self * rhs.x, self * rhs.y)
    }
}

pub const B1: V3 = V3 {
    x: 1.,
    y: 0.,
    z: 0.,
};

pub const B2: V3 = V3 {
    x: 0.,
    y: 1.,
    z: 0.,
};

pub const B3: V3 = V3 {
    x: 0.,
    y: 0.,
    z: 1.,
};

pub const O: V3 = V3 {
    x: 0.,
    y: 0.,
    z: 0.,
};
