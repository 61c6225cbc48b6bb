use super::Vec2;

/// 3D affine transform (row-major 3×4 matrix).
///
/// Point mapping:
/// - `x' = xx*x + xy*y + xz*z + tx`
/// - `y' = yx*x + yy*y + yz*z + ty`
/// - `z' = zx*x + zy*y + zz*z + tz`
///
/// Frame graphics state tracks the full 3D form so that scene transforms with
/// a Z component survive round trips through the context, while the common
/// identity/translate case stays cheap to detect.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Affine3 {
    pub xx: f32, pub xy: f32, pub xz: f32, pub tx: f32,
    pub yx: f32, pub yy: f32, pub yz: f32, pub ty: f32,
    pub zx: f32, pub zy: f32, pub zz: f32, pub tz: f32,
}

impl Default for Affine3 {
    #[inline]
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Affine3 {
    pub const IDENTITY: Affine3 = Affine3 {
        xx: 1.0, xy: 0.0, xz: 0.0, tx: 0.0,
        yx: 0.0, yy: 1.0, yz: 0.0, ty: 0.0,
        zx: 0.0, zy: 0.0, zz: 1.0, tz: 0.0,
    };

    /// 2D affine transform embedded in the XY plane.
    ///
    /// Component order matches the usual 2D convention
    /// `(xx, xy, tx, yx, yy, ty)`.
    #[inline]
    pub const fn from_2d(xx: f32, xy: f32, tx: f32, yx: f32, yy: f32, ty: f32) -> Self {
        Affine3 {
            xx, xy, xz: 0.0, tx,
            yx, yy, yz: 0.0, ty,
            zx: 0.0, zy: 0.0, zz: 1.0, tz: 0.0,
        }
    }

    #[inline]
    pub const fn from_translation(tx: f32, ty: f32, tz: f32) -> Self {
        Affine3 { tx, ty, tz, ..Self::IDENTITY }
    }

    #[inline]
    pub const fn from_scale(sx: f32, sy: f32, sz: f32) -> Self {
        Affine3 { xx: sx, yy: sy, zz: sz, ..Self::IDENTITY }
    }

    /// True when the linear part is exactly the identity (translation may be
    /// arbitrary). This is the gate for the simple-translate fast path, so the
    /// comparison is exact rather than epsilon-based.
    #[inline]
    pub fn is_translate_or_identity(&self) -> bool {
        self.xx == 1.0 && self.xy == 0.0 && self.xz == 0.0
            && self.yx == 0.0 && self.yy == 1.0 && self.yz == 0.0
            && self.zx == 0.0 && self.zy == 0.0 && self.zz == 1.0
    }

    #[inline]
    pub fn is_identity(&self) -> bool {
        self.is_translate_or_identity() && self.tx == 0.0 && self.ty == 0.0 && self.tz == 0.0
    }

    /// XY translation components.
    #[inline]
    pub fn translation(&self) -> (f32, f32) {
        (self.tx, self.ty)
    }

    /// `self ∘ other`: the returned transform applies `other` first.
    pub fn concat(&self, o: &Affine3) -> Affine3 {
        Affine3 {
            xx: self.xx * o.xx + self.xy * o.yx + self.xz * o.zx,
            xy: self.xx * o.xy + self.xy * o.yy + self.xz * o.zy,
            xz: self.xx * o.xz + self.xy * o.yz + self.xz * o.zz,
            tx: self.xx * o.tx + self.xy * o.ty + self.xz * o.tz + self.tx,

            yx: self.yx * o.xx + self.yy * o.yx + self.yz * o.zx,
            yy: self.yx * o.xy + self.yy * o.yy + self.yz * o.zy,
            yz: self.yx * o.xz + self.yy * o.yz + self.yz * o.zz,
            ty: self.yx * o.tx + self.yy * o.ty + self.yz * o.tz + self.ty,

            zx: self.zx * o.xx + self.zy * o.yx + self.zz * o.zx,
            zy: self.zx * o.xy + self.zy * o.yy + self.zz * o.zy,
            zz: self.zx * o.xz + self.zy * o.yz + self.zz * o.zz,
            tz: self.zx * o.tx + self.zy * o.ty + self.zz * o.tz + self.tz,
        }
    }

    /// Appends a translation (applied before the existing transform).
    #[inline]
    pub fn translated(&self, tx: f32, ty: f32, tz: f32) -> Affine3 {
        Affine3 {
            tx: self.xx * tx + self.xy * ty + self.xz * tz + self.tx,
            ty: self.yx * tx + self.yy * ty + self.yz * tz + self.ty,
            tz: self.zx * tx + self.zy * ty + self.zz * tz + self.tz,
            ..*self
        }
    }

    /// Appends a scale (applied before the existing transform).
    #[inline]
    pub fn scaled(&self, sx: f32, sy: f32, sz: f32) -> Affine3 {
        Affine3 {
            xx: self.xx * sx, xy: self.xy * sy, xz: self.xz * sz,
            yx: self.yx * sx, yy: self.yy * sy, yz: self.yz * sz,
            zx: self.zx * sx, zy: self.zy * sy, zz: self.zz * sz,
            ..*self
        }
    }

    /// Maps a point in the Z=0 plane, dropping the resulting Z.
    #[inline]
    pub fn transform_point(&self, p: Vec2) -> Vec2 {
        Vec2::new(
            self.xx * p.x + self.xy * p.y + self.tx,
            self.yx * p.x + self.yy * p.y + self.ty,
        )
    }
}
