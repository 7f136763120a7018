//! GeoTIFF metadata reader.
//!
//! Reads only the first image file directory: dimensions, the georeferencing
//! tags and the GeoKey directory. Pixel data is never decoded.

use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;

use tiff::decoder::ifd::Value;
use tiff::decoder::Decoder;
use tiff::tags::Tag;

use crate::error::ExtractionError;
use crate::geometry::BoundingBox;

// GeoTIFF Tag IDs
pub const GEOTIFF_MODELPIXELSCALE: u16 = 33550;
pub const GEOTIFF_MODELTIEPOINT: u16 = 33922;
pub const GEOTIFF_MODELTRANSFORMATION: u16 = 34264;
pub const GEOTIFF_GEOKEYDIRECTORY: u16 = 34735;

// GeoKey IDs
pub const GT_MODEL_TYPE_GEO_KEY: u16 = 1024;
pub const GT_RASTER_TYPE_GEO_KEY: u16 = 1025;
pub const GEOGRAPHIC_TYPE_GEO_KEY: u16 = 2048;
pub const PROJECTED_CS_TYPE_GEO_KEY: u16 = 3072;
pub const PROJECTION_GEO_KEY: u16 = 3074;

// GeoKey values
pub const MODEL_TYPE_PROJECTED: u16 = 1;
pub const MODEL_TYPE_GEOGRAPHIC: u16 = 2;
pub const RASTER_PIXEL_IS_AREA: u16 = 1;
pub const RASTER_PIXEL_IS_POINT: u16 = 2;
/// GeoKey value marking a user-defined CRS, which has no EPSG code
pub const USER_DEFINED: u16 = 32767;

/// Map a GeoTIFF tag number to the decoder's tag enum.
fn geotiff_tag(code: u16) -> Tag {
    Tag::from_u16_exhaustive(code)
}

/// Raw georeferencing tags of a GeoTIFF.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GeoTransform {
    /// ModelPixelScale: `[ScaleX, ScaleY, ScaleZ]`
    pub pixel_scale: Option<[f64; 3]>,
    /// First ModelTiepoint: `[I, J, K, X, Y, Z]`
    pub tiepoint: Option<[f64; 6]>,
    /// ModelTransformation: row-major 4x4 matrix
    pub transformation: Option<[f64; 16]>,
}

impl GeoTransform {
    /// Affine pixel-to-model transform, preferring ModelTransformation when present.
    #[must_use]
    pub fn affine(&self) -> Option<Affine> {
        if let Some(m) = &self.transformation {
            return Some(Affine {
                a: m[0],
                b: m[1],
                c: m[3],
                d: m[4],
                e: m[5],
                f: m[7],
            });
        }
        let (scale, tie) = (self.pixel_scale?, self.tiepoint?);
        // Tiepoint (i, j, k, x, y, z) maps pixel (i,j,k) to world (x,y,z); rows grow southward
        Some(Affine {
            a: scale[0],
            b: 0.0,
            c: tie[3] - tie[0] * scale[0],
            d: 0.0,
            e: -scale[1],
            f: tie[4] + tie[1] * scale[1],
        })
    }
}

/// Pixel `(col, row)` to model `(x, y)`: `x = a*col + b*row + c`, `y = d*col + e*row + f`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Affine {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub e: f64,
    pub f: f64,
}

impl Affine {
    #[must_use]
    pub fn apply(&self, col: f64, row: f64) -> (f64, f64) {
        (
            self.a * col + self.b * row + self.c,
            self.d * col + self.e * row + self.f,
        )
    }
}

/// CRS-related keys parsed from a GeoKeyDirectory.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GeoKeys {
    pub model_type: Option<u16>,
    pub raster_type: Option<u16>,
    pub geographic_type: Option<u16>,
    pub projected_type: Option<u16>,
    /// ProjectionGeoKey: a projection without a full projected CRS code
    pub projection: Option<u16>,
}

impl GeoKeys {
    /// Parse the directory header and entries.
    ///
    /// Layout: `[version, revision, minor, count, (key, location, count, value)*]`.
    /// Only keys stored inline (location 0) are read; the CRS keys always are.
    #[must_use]
    pub fn parse(directory: &[u16]) -> Self {
        let mut keys = Self::default();
        let Some(&count) = directory.get(3) else {
            return keys;
        };
        for entry in directory[4..].chunks_exact(4).take(usize::from(count)) {
            let (key_id, location, value) = (entry[0], entry[1], entry[3]);
            if location != 0 {
                continue;
            }
            match key_id {
                GT_MODEL_TYPE_GEO_KEY => keys.model_type = Some(value),
                GT_RASTER_TYPE_GEO_KEY => keys.raster_type = Some(value),
                GEOGRAPHIC_TYPE_GEO_KEY => keys.geographic_type = Some(value),
                PROJECTED_CS_TYPE_GEO_KEY => keys.projected_type = Some(value),
                PROJECTION_GEO_KEY => keys.projection = Some(value),
                _ => {}
            }
        }
        keys
    }

    /// Resolve the EPSG code of the raster's CRS.
    ///
    /// A projected model only resolves through ProjectedCSTypeGeoKey and a
    /// geographic model only through GeographicTypeGeoKey. The other key is
    /// never used as a substitute, since it names a different kind of
    /// coordinate. Without a model type the projected key is tried first.
    ///
    /// # Errors
    /// `MissingCrs` when the matching key is not set, `UnsupportedCrs` for a
    /// user-defined CRS or a projection given only through ProjectionGeoKey.
    pub fn epsg_code(&self) -> Result<i32, ExtractionError> {
        let code = match self.model_type {
            Some(MODEL_TYPE_PROJECTED) => {
                let code = self.projected_type.filter(|&c| c != 0);
                if code.is_none() {
                    if let Some(projection) = self.projection.filter(|&c| c != 0) {
                        return Err(ExtractionError::UnsupportedCrs(i32::from(projection)));
                    }
                }
                code
            }
            Some(MODEL_TYPE_GEOGRAPHIC) => self.geographic_type.filter(|&c| c != 0),
            _ => [self.projected_type, self.geographic_type]
                .into_iter()
                .flatten()
                .find(|&c| c != 0),
        };
        match code {
            Some(USER_DEFINED) => Err(ExtractionError::UnsupportedCrs(i32::from(USER_DEFINED))),
            Some(code) => Ok(i32::from(code)),
            None => Err(ExtractionError::MissingCrs),
        }
    }

    #[must_use]
    pub fn pixel_is_point(&self) -> bool {
        self.raster_type == Some(RASTER_PIXEL_IS_POINT)
    }
}

/// Metadata of one GeoTIFF, as needed to compute its footprint.
#[derive(Debug, Clone)]
pub struct RasterMetadata {
    /// Image width in pixels
    pub width: u32,
    /// Image height in pixels
    pub height: u32,
    pub geo_transform: GeoTransform,
    /// `None` when the file has no GeoKeyDirectory
    pub geo_keys: Option<GeoKeys>,
}

impl RasterMetadata {
    /// Open a GeoTIFF file and read its metadata.
    ///
    /// # Errors
    /// Returns an error if the file cannot be opened or is not a TIFF.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, ExtractionError> {
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }

    /// Read metadata from any seekable source.
    ///
    /// # Errors
    /// Returns an error if the data is not a TIFF or a georeferencing tag is malformed.
    pub fn from_reader<R: Read + Seek>(reader: R) -> Result<Self, ExtractionError> {
        let mut decoder = Decoder::new(reader)?;
        let (width, height) = decoder.dimensions()?;

        let pixel_scale = find_f64_vec(&mut decoder, GEOTIFF_MODELPIXELSCALE)?
            .map(|v| fixed::<3>(&v, "ModelPixelScale"))
            .transpose()?;
        let tiepoint = find_f64_vec(&mut decoder, GEOTIFF_MODELTIEPOINT)?
            .map(|v| fixed::<6>(&v, "ModelTiepoint"))
            .transpose()?;
        let transformation = find_f64_vec(&mut decoder, GEOTIFF_MODELTRANSFORMATION)?
            .map(|v| fixed::<16>(&v, "ModelTransformation"))
            .transpose()?;

        let geo_keys = decoder
            .find_tag(geotiff_tag(GEOTIFF_GEOKEYDIRECTORY))?
            .map(Value::into_u16_vec)
            .transpose()?
            .map(|directory| GeoKeys::parse(&directory));

        Ok(Self {
            width,
            height,
            geo_transform: GeoTransform {
                pixel_scale,
                tiepoint,
                transformation,
            },
            geo_keys,
        })
    }

    /// EPSG code of the native CRS.
    ///
    /// # Errors
    /// See [`GeoKeys::epsg_code`]; `MissingCrs` if there is no GeoKeyDirectory.
    pub fn crs_code(&self) -> Result<i32, ExtractionError> {
        self.geo_keys
            .as_ref()
            .ok_or(ExtractionError::MissingCrs)?
            .epsg_code()
    }

    /// Bounding box in the native CRS, taken over all four pixel-grid corners.
    ///
    /// For PixelIsPoint rasters the grid is shifted by half a pixel so the box
    /// covers the pixel areas rather than their centers.
    ///
    /// # Errors
    /// `MissingGeoreference` if the file has no usable georeferencing tags.
    pub fn native_bounds(&self) -> Result<BoundingBox, ExtractionError> {
        let affine = self
            .geo_transform
            .affine()
            .ok_or(ExtractionError::MissingGeoreference)?;
        let offset = if self.geo_keys.is_some_and(|k| k.pixel_is_point()) {
            -0.5
        } else {
            0.0
        };
        let (w, h) = (f64::from(self.width) + offset, f64::from(self.height) + offset);
        let corners = [(offset, offset), (w, offset), (w, h), (offset, h)]
            .map(|(col, row)| affine.apply(col, row));
        BoundingBox::from_points(corners).ok_or(ExtractionError::MissingGeoreference)
    }
}

fn find_f64_vec<R: Read + Seek>(
    decoder: &mut Decoder<R>,
    code: u16,
) -> Result<Option<Vec<f64>>, ExtractionError> {
    Ok(decoder
        .find_tag(geotiff_tag(code))?
        .map(Value::into_f64_vec)
        .transpose()?)
}

fn fixed<const N: usize>(values: &[f64], name: &str) -> Result<[f64; N], ExtractionError> {
    values
        .get(..N)
        .and_then(|s| <[f64; N]>::try_from(s).ok())
        .ok_or_else(|| ExtractionError::Tiff(format!("{name} has {} values, expected {N}", values.len())))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utm_keys() -> Vec<u16> {
        vec![
            1, 1, 0, 3,
            GT_MODEL_TYPE_GEO_KEY, 0, 1, MODEL_TYPE_PROJECTED,
            GT_RASTER_TYPE_GEO_KEY, 0, 1, RASTER_PIXEL_IS_AREA,
            PROJECTED_CS_TYPE_GEO_KEY, 0, 1, 32636,
        ]
    }

    #[test]
    fn test_parse_projected_keys() {
        let keys = GeoKeys::parse(&utm_keys());
        assert_eq!(keys.model_type, Some(MODEL_TYPE_PROJECTED));
        assert_eq!(keys.projected_type, Some(32636));
        assert!(!keys.pixel_is_point());
        assert_eq!(keys.epsg_code().unwrap(), 32636);
    }

    #[test]
    fn test_parse_geographic_keys() {
        let directory = [
            1, 1, 0, 2,
            GT_MODEL_TYPE_GEO_KEY, 0, 1, MODEL_TYPE_GEOGRAPHIC,
            GEOGRAPHIC_TYPE_GEO_KEY, 0, 1, 4326,
        ];
        assert_eq!(GeoKeys::parse(&directory).epsg_code().unwrap(), 4326);
    }

    #[test]
    fn test_parse_truncated_directory() {
        assert_eq!(GeoKeys::parse(&[1, 1]), GeoKeys::default());
        // Header claims more keys than present
        let keys = GeoKeys::parse(&[1, 1, 0, 5, GEOGRAPHIC_TYPE_GEO_KEY, 0, 1, 4326]);
        assert_eq!(keys.geographic_type, Some(4326));
    }

    #[test]
    fn test_keys_stored_elsewhere_are_ignored() {
        let directory = [1, 1, 0, 1, PROJECTED_CS_TYPE_GEO_KEY, 34736, 1, 0];
        assert!(matches!(
            GeoKeys::parse(&directory).epsg_code(),
            Err(ExtractionError::MissingCrs)
        ));
    }

    #[test]
    fn test_projected_model_never_falls_back_to_geographic_key() {
        let directory = [
            1, 1, 0, 2,
            GT_MODEL_TYPE_GEO_KEY, 0, 1, MODEL_TYPE_PROJECTED,
            GEOGRAPHIC_TYPE_GEO_KEY, 0, 1, 4326,
        ];
        assert!(matches!(
            GeoKeys::parse(&directory).epsg_code(),
            Err(ExtractionError::MissingCrs)
        ));
    }

    #[test]
    fn test_projection_key_alone_is_unsupported() {
        // UTM 36N given as a projection code plus a geographic datum
        let directory = [
            1, 1, 0, 3,
            GT_MODEL_TYPE_GEO_KEY, 0, 1, MODEL_TYPE_PROJECTED,
            GEOGRAPHIC_TYPE_GEO_KEY, 0, 1, 4326,
            PROJECTION_GEO_KEY, 0, 1, 16036,
        ];
        let keys = GeoKeys::parse(&directory);
        assert_eq!(keys.projection, Some(16036));
        assert!(matches!(keys.epsg_code(), Err(ExtractionError::UnsupportedCrs(16036))));
    }

    #[test]
    fn test_geographic_model_ignores_projected_key() {
        let keys = GeoKeys {
            model_type: Some(MODEL_TYPE_GEOGRAPHIC),
            projected_type: Some(32636),
            ..GeoKeys::default()
        };
        assert!(matches!(keys.epsg_code(), Err(ExtractionError::MissingCrs)));
    }

    #[test]
    fn test_user_defined_crs_is_unsupported() {
        let directory = [1, 1, 0, 1, PROJECTED_CS_TYPE_GEO_KEY, 0, 1, USER_DEFINED];
        assert!(matches!(
            GeoKeys::parse(&directory).epsg_code(),
            Err(ExtractionError::UnsupportedCrs(32767))
        ));
    }

    #[test]
    fn test_bounds_from_scale_and_tiepoint() {
        let meta = RasterMetadata {
            width: 100,
            height: 50,
            geo_transform: GeoTransform {
                pixel_scale: Some([10.0, 10.0, 0.0]),
                tiepoint: Some([0.0, 0.0, 0.0, 500_000.0, 4_000_000.0, 0.0]),
                transformation: None,
            },
            geo_keys: Some(GeoKeys::parse(&utm_keys())),
        };
        let bounds = meta.native_bounds().unwrap();
        assert_eq!(bounds, BoundingBox::new(500_000.0, 3_999_500.0, 501_000.0, 4_000_000.0));
    }

    #[test]
    fn test_bounds_pixel_is_point_shift() {
        let mut keys = GeoKeys::parse(&utm_keys());
        keys.raster_type = Some(RASTER_PIXEL_IS_POINT);
        let meta = RasterMetadata {
            width: 10,
            height: 10,
            geo_transform: GeoTransform {
                pixel_scale: Some([1.0, 1.0, 0.0]),
                tiepoint: Some([0.0, 0.0, 0.0, 100.0, 200.0, 0.0]),
                transformation: None,
            },
            geo_keys: Some(keys),
        };
        let bounds = meta.native_bounds().unwrap();
        assert_eq!(bounds, BoundingBox::new(99.5, 190.5, 109.5, 200.5));
    }

    #[test]
    fn test_bounds_from_rotated_transformation() {
        // 90 degree rotation: columns run north, rows run east
        let mut m = [0.0; 16];
        m[1] = 1.0; // x = row + 10
        m[3] = 10.0;
        m[4] = 1.0; // y = col + 20
        m[7] = 20.0;
        m[15] = 1.0;
        let meta = RasterMetadata {
            width: 4,
            height: 2,
            geo_transform: GeoTransform {
                pixel_scale: None,
                tiepoint: None,
                transformation: Some(m),
            },
            geo_keys: None,
        };
        let bounds = meta.native_bounds().unwrap();
        assert_eq!(bounds, BoundingBox::new(10.0, 20.0, 12.0, 24.0));
        assert!(bounds.is_ordered());
    }

    #[test]
    fn test_missing_georeference() {
        let meta = RasterMetadata {
            width: 4,
            height: 4,
            geo_transform: GeoTransform::default(),
            geo_keys: None,
        };
        assert!(matches!(meta.native_bounds(), Err(ExtractionError::MissingGeoreference)));
        assert!(matches!(meta.crs_code(), Err(ExtractionError::MissingCrs)));
    }

    #[test]
    fn test_not_a_tiff() {
        let bytes = b"this is certainly not a tiff".to_vec();
        let result = RasterMetadata::from_reader(std::io::Cursor::new(bytes));
        assert!(matches!(result, Err(ExtractionError::Tiff(_)) | Err(ExtractionError::Io(_))));
    }
}
