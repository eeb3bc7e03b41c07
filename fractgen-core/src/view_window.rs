use crate::error::{FractalError, Result};
use crate::real::Real;
use serde::{Deserialize, Serialize};

/// Logical view onto the complex plane.
///
/// Defined by a center point, the visible width in fractal space
/// (`diameter_x`) and the pixel size of the target image. The height in
/// fractal space and the bounding box are derived once at construction
/// and never change afterwards.
#[derive(Clone, Debug, PartialEq)]
pub struct ViewWindow<R> {
    center_x: R,
    center_y: R,
    diameter_x: R,
    image_width: u32,
    image_height: u32,
    aspect: R,
    diameter_y: R,
    min_x: R,
    max_x: R,
    min_y: R,
    max_y: R,
}

impl<R: Real> ViewWindow<R> {
    pub fn new(
        center_x: R,
        center_y: R,
        diameter_x: R,
        image_width: u32,
        image_height: u32,
    ) -> Result<Self> {
        if image_width == 0 || image_height == 0 {
            return Err(FractalError::InvalidViewWindow(format!(
                "image size must be positive, got {}x{}",
                image_width, image_height
            )));
        }
        for (name, value) in [
            ("center_x", &center_x),
            ("center_y", &center_y),
            ("diameter_x", &diameter_x),
        ] {
            if !value.is_finite() {
                return Err(FractalError::InvalidViewWindow(format!(
                    "{} must be finite, got {:?}",
                    name, value
                )));
            }
        }
        // Written as a negated comparison so NaN is rejected too.
        if !(diameter_x > diameter_x.constant(0.0)) {
            return Err(FractalError::InvalidViewWindow(format!(
                "diameter must be positive, got {:?}",
                diameter_x
            )));
        }

        let bits = diameter_x.precision_bits();
        let two = R::from_f64(2.0, bits);
        let aspect = R::from_f64(image_width as f64, bits).div(&R::from_f64(image_height as f64, bits));
        let diameter_y = diameter_x.div(&aspect);
        let min_x = center_x.sub(&diameter_x.div(&two));
        let max_x = min_x.add(&diameter_x);
        let min_y = center_y.sub(&diameter_y.div(&two));
        let max_y = min_y.add(&diameter_y);

        Ok(Self {
            center_x,
            center_y,
            diameter_x,
            image_width,
            image_height,
            aspect,
            diameter_y,
            min_x,
            max_x,
            min_y,
            max_y,
        })
    }

    /// Create from native floats at the given precision.
    pub fn from_f64(
        center_x: f64,
        center_y: f64,
        diameter_x: f64,
        image_width: u32,
        image_height: u32,
        precision_bits: usize,
    ) -> Result<Self> {
        Self::new(
            R::from_f64(center_x, precision_bits),
            R::from_f64(center_y, precision_bits),
            R::from_f64(diameter_x, precision_bits),
            image_width,
            image_height,
        )
    }

    /// Map a pixel position to a point in the complex plane.
    ///
    /// Image row 0 is the top of the picture while the imaginary axis grows
    /// upward, so the row is flipped before mapping. `(0, image_height)`
    /// lands on `(min_x, min_y)` and `(image_width, 0)` on `(max_x, max_y)`.
    pub fn pixel_to_complex(&self, x: u32, y: u32) -> (R, R) {
        let flipped_y = self.image_height as f64 - y as f64;
        let bits = self.precision_bits();
        let fraction_x = R::from_f64(x as f64 / self.image_width as f64, bits);
        let fraction_y = R::from_f64(flipped_y / self.image_height as f64, bits);

        let cx = self.min_x.add(&self.diameter_x.mul(&fraction_x));
        let cy = self.min_y.add(&self.diameter_y.mul(&fraction_y));
        (cx, cy)
    }

    pub fn precision_bits(&self) -> usize {
        self.diameter_x.precision_bits()
    }

    pub fn center_x(&self) -> &R {
        &self.center_x
    }

    pub fn center_y(&self) -> &R {
        &self.center_y
    }

    pub fn diameter_x(&self) -> &R {
        &self.diameter_x
    }

    pub fn diameter_y(&self) -> &R {
        &self.diameter_y
    }

    pub fn aspect(&self) -> &R {
        &self.aspect
    }

    pub fn min_x(&self) -> &R {
        &self.min_x
    }

    pub fn max_x(&self) -> &R {
        &self.max_x
    }

    pub fn min_y(&self) -> &R {
        &self.min_y
    }

    pub fn max_y(&self) -> &R {
        &self.max_y
    }

    pub fn image_width(&self) -> u32 {
        self.image_width
    }

    pub fn image_height(&self) -> u32 {
        self.image_height
    }

    /// Same window with a different center and diameter, keeping the image size.
    pub fn moved_to(&self, center_x: R, center_y: R, diameter_x: R) -> Result<Self> {
        Self::new(
            center_x,
            center_y,
            diameter_x,
            self.image_width,
            self.image_height,
        )
    }
}

/// Precision-neutral description of a view, as supplied by presets,
/// the command line or a tile request.
///
/// Coordinates are kept as decimal strings so deep-zoom positions survive
/// serialization without being squeezed through f64.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ViewDescriptor {
    pub center_x: String,
    pub center_y: String,
    pub diameter_x: String,
    pub image_width: u32,
    pub image_height: u32,
}

impl ViewDescriptor {
    pub fn from_f64(
        center_x: f64,
        center_y: f64,
        diameter_x: f64,
        image_width: u32,
        image_height: u32,
    ) -> Self {
        Self {
            center_x: center_x.to_string(),
            center_y: center_y.to_string(),
            diameter_x: diameter_x.to_string(),
            image_width,
            image_height,
        }
    }

    /// Parse into a concrete view window in the requested numeric type.
    pub fn parse<R: Real>(&self, precision_bits: usize) -> Result<ViewWindow<R>> {
        ViewWindow::new(
            R::parse(&self.center_x, precision_bits)?,
            R::parse(&self.center_y, precision_bits)?,
            R::parse(&self.diameter_x, precision_bits)?,
            self.image_width,
            self.image_height,
        )
    }
}
