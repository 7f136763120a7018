//! GeoTIFF fixtures written with the `tiff` encoder.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use tiff::encoder::colortype::Gray8;
use tiff::encoder::TiffEncoder;
use tiff::tags::Tag;

use tifzones::raster_meta::{
    GEOGRAPHIC_TYPE_GEO_KEY, GEOTIFF_GEOKEYDIRECTORY, GEOTIFF_MODELPIXELSCALE, GEOTIFF_MODELTIEPOINT,
    GT_MODEL_TYPE_GEO_KEY, GT_RASTER_TYPE_GEO_KEY, MODEL_TYPE_GEOGRAPHIC, MODEL_TYPE_PROJECTED,
    PROJECTED_CS_TYPE_GEO_KEY, RASTER_PIXEL_IS_AREA,
};
use tifzones::is_geographic_crs;

/// A small north-up GeoTIFF description.
pub struct Fixture {
    pub width: u32,
    pub height: u32,
    /// `None` writes no GeoKeyDirectory at all
    pub epsg: Option<u16>,
    /// Upper-left corner in native units
    pub origin: (f64, f64),
    pub pixel_size: f64,
}

impl Fixture {
    /// 8x8 raster in EPSG:4326 covering `(minx, miny)` to `(minx + size, miny + size)`
    pub fn wgs84(minx: f64, miny: f64, size: f64) -> Self {
        Self {
            width: 8,
            height: 8,
            epsg: Some(4326),
            origin: (minx, miny + size),
            pixel_size: size / 8.0,
        }
    }

    /// 10x10 raster in a projected CRS with its upper-left corner at `origin`
    pub fn projected(epsg: u16, origin: (f64, f64), pixel_size: f64) -> Self {
        Self {
            width: 10,
            height: 10,
            epsg: Some(epsg),
            origin,
            pixel_size,
        }
    }

    pub fn without_crs(mut self) -> Self {
        self.epsg = None;
        self
    }

    fn geokey_directory(epsg: u16) -> Vec<u16> {
        let is_geographic = is_geographic_crs(i32::from(epsg));
        let mut keys = vec![1, 1, 0, 3];
        keys.extend_from_slice(&[
            GT_MODEL_TYPE_GEO_KEY,
            0,
            1,
            if is_geographic { MODEL_TYPE_GEOGRAPHIC } else { MODEL_TYPE_PROJECTED },
        ]);
        keys.extend_from_slice(&[GT_RASTER_TYPE_GEO_KEY, 0, 1, RASTER_PIXEL_IS_AREA]);
        if is_geographic {
            keys.extend_from_slice(&[GEOGRAPHIC_TYPE_GEO_KEY, 0, 1, epsg]);
        } else {
            keys.extend_from_slice(&[PROJECTED_CS_TYPE_GEO_KEY, 0, 1, epsg]);
        }
        keys
    }

    pub fn write(&self, path: &Path) {
        let file = BufWriter::new(File::create(path).unwrap());
        let mut encoder = TiffEncoder::new(file).unwrap();
        let mut image = encoder.new_image::<Gray8>(self.width, self.height).unwrap();

        let pixel_scale = [self.pixel_size, self.pixel_size, 0.0];
        image
            .encoder()
            .write_tag(Tag::from_u16_exhaustive(GEOTIFF_MODELPIXELSCALE), pixel_scale.as_slice())
            .unwrap();
        let tiepoint = [0.0, 0.0, 0.0, self.origin.0, self.origin.1, 0.0];
        image
            .encoder()
            .write_tag(Tag::from_u16_exhaustive(GEOTIFF_MODELTIEPOINT), tiepoint.as_slice())
            .unwrap();
        if let Some(epsg) = self.epsg {
            let geokeys = Self::geokey_directory(epsg);
            image
                .encoder()
                .write_tag(Tag::from_u16_exhaustive(GEOTIFF_GEOKEYDIRECTORY), geokeys.as_slice())
                .unwrap();
        }

        let pixels = vec![0u8; (self.width * self.height) as usize];
        image.write_data(&pixels).unwrap();
    }
}

pub fn write_garbage(path: &Path) {
    std::fs::write(path, b"II*\0 definitely truncated").unwrap();
}
