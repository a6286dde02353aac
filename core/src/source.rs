//! Schema of the JSON location documents produced by the map authoring tool.

use serde::{Deserialize, Serialize};

use crate::{LocationId, PixelPosition, TileId, TileSize, Warp};

/// Raw description of a location as decoded from its JSON document.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationSource {
    /// Width of the location in pixels.
    pub pixel_width: u32,
    /// Height of the location in pixels.
    pub pixel_height: u32,
    /// Tiles making up the location.
    pub tile_layer: TileLayerSource,
    /// Warps and the optional start point.
    #[serde(default)]
    pub object_layer: ObjectLayerSource,
}

/// Tile layer of a location.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TileLayerSource {
    /// Width of a tile in pixels.
    pub tile_width: u32,
    /// Height of a tile in pixels.
    pub tile_height: u32,
    /// Name of the tileset the tile ids refer to.
    pub tileset_name: String,
    /// Placed tiles; cells without an entry stay empty.
    #[serde(default)]
    pub tiles: Vec<TileSource>,
}

impl TileLayerSource {
    /// Tile dimensions of the layer.
    #[must_use]
    pub const fn tile_size(&self) -> TileSize {
        TileSize::new(self.tile_width, self.tile_height)
    }
}

/// Single tile placement.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TileSource {
    /// Horizontal pixel coordinate of the tile.
    pub pixel_x: i32,
    /// Vertical pixel coordinate of the tile.
    pub pixel_y: i32,
    /// Tile identifier within the tileset.
    pub tile_id: TileId,
}

/// Object layer of a location.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectLayerSource {
    /// Warp points placed on the location.
    #[serde(default)]
    pub warps: Vec<WarpSource>,
    /// Point the player spawns at on the very first load.
    #[serde(default)]
    pub start: Option<StartSource>,
}

/// Warp object as authored.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WarpSource {
    /// Horizontal pixel coordinate of the warp origin.
    pub pixel_x: i32,
    /// Vertical pixel coordinate of the warp origin.
    pub pixel_y: i32,
    /// Horizontal pixel coordinate of the destination.
    pub dest_pixel_x: i32,
    /// Vertical pixel coordinate of the destination.
    pub dest_pixel_y: i32,
    /// Location the warp leads to.
    pub dest_location_id: LocationId,
}

impl WarpSource {
    /// Converts the authored object into a runtime warp, verbatim.
    #[must_use]
    pub fn to_warp(&self) -> Warp {
        Warp {
            origin: PixelPosition::new(self.pixel_x, self.pixel_y),
            destination: PixelPosition::new(self.dest_pixel_x, self.dest_pixel_y),
            destination_location: self.dest_location_id.clone(),
        }
    }
}

/// Start point object as authored.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartSource {
    /// Horizontal pixel coordinate of the start point.
    pub pixel_x: i32,
    /// Vertical pixel coordinate of the start point.
    pub pixel_y: i32,
}

impl StartSource {
    /// Start point as a pixel position.
    #[must_use]
    pub const fn position(&self) -> PixelPosition {
        PixelPosition::new(self.pixel_x, self.pixel_y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOWN: &str = r#"{
        "pixelWidth": 32,
        "pixelHeight": 16,
        "tileLayer": {
            "tileWidth": 8,
            "tileHeight": 8,
            "tilesetName": "tiles",
            "tiles": [
                { "pixelX": 0, "pixelY": 0, "tileId": 0 },
                { "pixelX": 8, "pixelY": 0, "tileId": 1 }
            ]
        },
        "objectLayer": {
            "warps": [
                { "pixelX": 8, "pixelY": 8, "destPixelX": 16, "destPixelY": 0, "destLocationId": "world" }
            ],
            "start": { "pixelX": 0, "pixelY": 0 }
        }
    }"#;

    #[test]
    fn decodes_authored_location() {
        let source: LocationSource = serde_json::from_str(TOWN).expect("location decodes");
        assert_eq!(source.pixel_width, 32);
        assert_eq!(source.tile_layer.tile_size(), TileSize::new(8, 8));
        assert_eq!(source.tile_layer.tiles[1].tile_id, TileId::new(1));
        let warp = source.object_layer.warps[0].to_warp();
        assert_eq!(warp.origin, PixelPosition::new(8, 8));
        assert_eq!(warp.destination, PixelPosition::new(16, 0));
        assert_eq!(warp.destination_location, LocationId::new("world"));
        assert_eq!(
            source.object_layer.start.map(|start| start.position()),
            Some(PixelPosition::new(0, 0))
        );
    }

    #[test]
    fn object_layer_is_optional() {
        let json = r#"{
            "pixelWidth": 8,
            "pixelHeight": 8,
            "tileLayer": { "tileWidth": 8, "tileHeight": 8, "tilesetName": "tiles" }
        }"#;
        let source: LocationSource = serde_json::from_str(json).expect("location decodes");
        assert!(source.object_layer.warps.is_empty());
        assert!(source.object_layer.start.is_none());
        assert!(source.tile_layer.tiles.is_empty());
    }
}
