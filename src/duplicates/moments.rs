use image::GrayImage;

/// Number of Hu invariants per channel
pub const HU_COUNT: usize = 7;

/// Spatial, central and normalized central moments up to order 3 of an
/// intensity plane. `x` is the column and `y` the row.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Moments {
    pub m00: f64,
    pub m10: f64,
    pub m01: f64,
    pub m20: f64,
    pub m11: f64,
    pub m02: f64,
    pub m30: f64,
    pub m21: f64,
    pub m12: f64,
    pub m03: f64,

    pub mu20: f64,
    pub mu11: f64,
    pub mu02: f64,
    pub mu30: f64,
    pub mu21: f64,
    pub mu12: f64,
    pub mu03: f64,

    pub nu20: f64,
    pub nu11: f64,
    pub nu02: f64,
    pub nu30: f64,
    pub nu21: f64,
    pub nu12: f64,
    pub nu03: f64,
}

impl Moments {
    pub fn of_plane(plane: &GrayImage) -> Self {
        let width = plane.width() as usize;
        let mut m = Moments::default();

        if width == 0 {
            return m;
        }

        // Row sums stay exact in u64 for 8-bit planes up to several thousand pixels wide.
        for (y, row) in plane.as_raw().chunks_exact(width).enumerate() {
            let (mut x0, mut x1, mut x2, mut x3) = (0u64, 0u64, 0u64, 0u64);
            for (x, &p) in row.iter().enumerate() {
                let p = p as u64;
                let x = x as u64;
                let xp = x * p;
                let xxp = xp * x;
                x0 += p;
                x1 += xp;
                x2 += xxp;
                x3 += xxp * x;
            }

            let (x0, x1, x2, x3) = (x0 as f64, x1 as f64, x2 as f64, x3 as f64);
            let py = y as f64;
            let sq_y = py * py;
            let cu_y = sq_y * py;

            m.m00 += x0;
            m.m10 += x1;
            m.m01 += x0 * py;
            m.m20 += x2;
            m.m11 += x1 * py;
            m.m02 += x0 * sq_y;
            m.m30 += x3;
            m.m21 += x2 * py;
            m.m12 += x1 * sq_y;
            m.m03 += x0 * cu_y;
        }

        m.complete();
        m
    }

    fn complete(&mut self) {
        let (cx, cy, inv_m00) = if self.m00.abs() > f64::EPSILON {
            let inv = 1.0 / self.m00;
            (self.m10 * inv, self.m01 * inv, inv)
        } else {
            (0.0, 0.0, 0.0)
        };

        self.mu20 = self.m20 - self.m10 * cx;
        self.mu11 = self.m11 - self.m10 * cy;
        self.mu02 = self.m02 - self.m01 * cy;
        self.mu30 = self.m30 - cx * (3.0 * self.mu20 + cx * self.m10);
        self.mu21 = self.m21 - cx * (2.0 * self.mu11 + cx * self.m01) - cy * self.mu20;
        self.mu12 = self.m12 - cy * (2.0 * self.mu11 + cy * self.m10) - cx * self.mu02;
        self.mu03 = self.m03 - cy * (3.0 * self.mu02 + cy * self.m01);

        let inv_sqrt_m00 = inv_m00.abs().sqrt();
        let s2 = inv_m00 * inv_m00;
        let s3 = s2 * inv_sqrt_m00;

        self.nu20 = self.mu20 * s2;
        self.nu11 = self.mu11 * s2;
        self.nu02 = self.mu02 * s2;
        self.nu30 = self.mu30 * s3;
        self.nu21 = self.mu21 * s3;
        self.nu12 = self.mu12 * s3;
        self.nu03 = self.mu03 * s3;
    }

    /// The seven Hu invariants.
    ///
    /// All are invariant to translation and scale; the first six are also
    /// invariant to reflection while the seventh flips sign.
    pub fn hu(&self) -> [f64; HU_COUNT] {
        let t0 = self.nu30 + self.nu12;
        let t1 = self.nu21 + self.nu03;
        let q0 = self.nu20 - self.nu02;
        let q1 = 4.0 * self.nu11;

        let mut hu = [0.0; HU_COUNT];
        hu[0] = self.nu20 + self.nu02;
        hu[1] = q0 * q0 + q1 * self.nu11;

        let s0 = self.nu30 - 3.0 * self.nu12;
        let s1 = 3.0 * self.nu21 - self.nu03;
        hu[2] = s0 * s0 + s1 * s1;

        let t0_sq = t0 * t0;
        let t1_sq = t1 * t1;
        hu[3] = t0_sq + t1_sq;

        let a = t0_sq - 3.0 * t1_sq;
        let b = 3.0 * t0_sq - t1_sq;
        hu[4] = s0 * t0 * a + s1 * t1 * b;
        hu[5] = q0 * (t0_sq - t1_sq) + q1 * t0 * t1;
        hu[6] = s1 * t0 * a - s0 * t1 * b;
        hu
    }
}

/// Hu invariants of a single 8-bit plane
pub fn hu_moments(plane: &GrayImage) -> [f64; HU_COUNT] {
    Moments::of_plane(plane).hu()
}
