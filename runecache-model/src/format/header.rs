//! Trailing model headers
//!
//! Each layout ends with a fixed-size header holding counts, presence flags
//! and segment lengths. All multi-byte fields are big-endian. Flag bytes
//! are true only when exactly 1.
//!
//! # Layouts
//! ```text
//! V3 (26 bytes)        V2 (23 bytes)        V1 (23 bytes)        Legacy (18 bytes)
//! vertices      u16    vertices      u16    vertices      u16    vertices      u16
//! faces         u16    faces         u16    faces         u16    faces         u16
//! tex triangles u8     tex triangles u8     tex triangles u8     tex triangles u8
//! render types  u8     packed render u8     render types  u8     packed render u8
//! priority      u8     priority      u8     priority      u8     priority      u8
//! alphas        u8     alphas        u8     alphas        u8     alphas        u8
//! face skins    u8     face skins    u8     face skins    u8     face skins    u8
//! textures      u8     vertex skins  u8     textures      u8     vertex skins  u8
//! vertex skins  u8     skin weights  u8     vertex skins  u8     x len         u16
//! skin weights  u8     x len         u16    x len         u16    y len         u16
//! x len         u16    y len         u16    y len         u16    z len         u16
//! y len         u16    z len         u16    z len         u16    index len     u16
//! z len         u16    index len     u16    index len     u16
//! index len     u16    skin len      u16    coord len     u16
//! coord len     u16    ff fe                ff ff
//! skin len      u16
//! ff fd
//! ```
//!
//! A priority byte of 255 means priorities are stored per face.

/// Priority byte announcing a per-face priority segment
pub const PER_FACE_PRIORITY: u8 = 255;

fn be_u16(bytes: &[u8], at: usize) -> u16 {
    u16::from_be_bytes([bytes[at], bytes[at + 1]])
}

fn put_u16(bytes: &mut [u8], at: usize, value: u16) {
    bytes[at..at + 2].copy_from_slice(&value.to_be_bytes());
}

/// Newest layout, with texture render types and skin weights
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct V3Header {
    pub vertex_count: u16,
    pub face_count: u16,
    pub texture_triangles: u8,
    pub has_render_types: bool,
    pub priority: u8,
    pub has_alphas: bool,
    pub has_face_skins: bool,
    pub has_textures: bool,
    pub has_vertex_skins: bool,
    pub has_skin_weights: bool,
    pub x_len: u16,
    pub y_len: u16,
    pub z_len: u16,
    pub face_index_len: u16,
    pub texture_coord_len: u16,
    pub vertex_skin_len: u16,
}

impl V3Header {
    pub const SIZE: usize = 26;
    pub const MARKER: [u8; 2] = [0xFF, 0xFD];

    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        if bytes.len() < Self::SIZE {
            return None;
        }
        Some(Self {
            vertex_count: be_u16(bytes, 0),
            face_count: be_u16(bytes, 2),
            texture_triangles: bytes[4],
            has_render_types: bytes[5] == 1,
            priority: bytes[6],
            has_alphas: bytes[7] == 1,
            has_face_skins: bytes[8] == 1,
            has_textures: bytes[9] == 1,
            has_vertex_skins: bytes[10] == 1,
            has_skin_weights: bytes[11] == 1,
            x_len: be_u16(bytes, 12),
            y_len: be_u16(bytes, 14),
            z_len: be_u16(bytes, 16),
            face_index_len: be_u16(bytes, 18),
            texture_coord_len: be_u16(bytes, 20),
            vertex_skin_len: be_u16(bytes, 22),
        })
    }

    pub fn to_bytes(&self) -> [u8; Self::SIZE] {
        let mut bytes = [0u8; Self::SIZE];
        put_u16(&mut bytes, 0, self.vertex_count);
        put_u16(&mut bytes, 2, self.face_count);
        bytes[4] = self.texture_triangles;
        bytes[5] = u8::from(self.has_render_types);
        bytes[6] = self.priority;
        bytes[7] = u8::from(self.has_alphas);
        bytes[8] = u8::from(self.has_face_skins);
        bytes[9] = u8::from(self.has_textures);
        bytes[10] = u8::from(self.has_vertex_skins);
        bytes[11] = u8::from(self.has_skin_weights);
        put_u16(&mut bytes, 12, self.x_len);
        put_u16(&mut bytes, 14, self.y_len);
        put_u16(&mut bytes, 16, self.z_len);
        put_u16(&mut bytes, 18, self.face_index_len);
        put_u16(&mut bytes, 20, self.texture_coord_len);
        put_u16(&mut bytes, 22, self.vertex_skin_len);
        bytes[24..].copy_from_slice(&Self::MARKER);
        bytes
    }
}

/// Packed render types with skin weights
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct V2Header {
    pub vertex_count: u16,
    pub face_count: u16,
    pub texture_triangles: u8,
    pub has_packed_render: bool,
    pub priority: u8,
    pub has_alphas: bool,
    pub has_face_skins: bool,
    pub has_vertex_skins: bool,
    pub has_skin_weights: bool,
    pub x_len: u16,
    pub y_len: u16,
    pub z_len: u16,
    pub face_index_len: u16,
    pub vertex_skin_len: u16,
}

impl V2Header {
    pub const SIZE: usize = 23;
    pub const MARKER: [u8; 2] = [0xFF, 0xFE];

    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        if bytes.len() < Self::SIZE {
            return None;
        }
        Some(Self {
            vertex_count: be_u16(bytes, 0),
            face_count: be_u16(bytes, 2),
            texture_triangles: bytes[4],
            has_packed_render: bytes[5] == 1,
            priority: bytes[6],
            has_alphas: bytes[7] == 1,
            has_face_skins: bytes[8] == 1,
            has_vertex_skins: bytes[9] == 1,
            has_skin_weights: bytes[10] == 1,
            x_len: be_u16(bytes, 11),
            y_len: be_u16(bytes, 13),
            z_len: be_u16(bytes, 15),
            face_index_len: be_u16(bytes, 17),
            vertex_skin_len: be_u16(bytes, 19),
        })
    }

    pub fn to_bytes(&self) -> [u8; Self::SIZE] {
        let mut bytes = [0u8; Self::SIZE];
        put_u16(&mut bytes, 0, self.vertex_count);
        put_u16(&mut bytes, 2, self.face_count);
        bytes[4] = self.texture_triangles;
        bytes[5] = u8::from(self.has_packed_render);
        bytes[6] = self.priority;
        bytes[7] = u8::from(self.has_alphas);
        bytes[8] = u8::from(self.has_face_skins);
        bytes[9] = u8::from(self.has_vertex_skins);
        bytes[10] = u8::from(self.has_skin_weights);
        put_u16(&mut bytes, 11, self.x_len);
        put_u16(&mut bytes, 13, self.y_len);
        put_u16(&mut bytes, 15, self.z_len);
        put_u16(&mut bytes, 17, self.face_index_len);
        put_u16(&mut bytes, 19, self.vertex_skin_len);
        bytes[21..].copy_from_slice(&Self::MARKER);
        bytes
    }
}

/// Texture render types without skin weights
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct V1Header {
    pub vertex_count: u16,
    pub face_count: u16,
    pub texture_triangles: u8,
    pub has_render_types: bool,
    pub priority: u8,
    pub has_alphas: bool,
    pub has_face_skins: bool,
    pub has_textures: bool,
    pub has_vertex_skins: bool,
    pub x_len: u16,
    pub y_len: u16,
    pub z_len: u16,
    pub face_index_len: u16,
    pub texture_coord_len: u16,
}

impl V1Header {
    pub const SIZE: usize = 23;
    pub const MARKER: [u8; 2] = [0xFF, 0xFF];

    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        if bytes.len() < Self::SIZE {
            return None;
        }
        Some(Self {
            vertex_count: be_u16(bytes, 0),
            face_count: be_u16(bytes, 2),
            texture_triangles: bytes[4],
            has_render_types: bytes[5] == 1,
            priority: bytes[6],
            has_alphas: bytes[7] == 1,
            has_face_skins: bytes[8] == 1,
            has_textures: bytes[9] == 1,
            has_vertex_skins: bytes[10] == 1,
            x_len: be_u16(bytes, 11),
            y_len: be_u16(bytes, 13),
            z_len: be_u16(bytes, 15),
            face_index_len: be_u16(bytes, 17),
            texture_coord_len: be_u16(bytes, 19),
        })
    }

    pub fn to_bytes(&self) -> [u8; Self::SIZE] {
        let mut bytes = [0u8; Self::SIZE];
        put_u16(&mut bytes, 0, self.vertex_count);
        put_u16(&mut bytes, 2, self.face_count);
        bytes[4] = self.texture_triangles;
        bytes[5] = u8::from(self.has_render_types);
        bytes[6] = self.priority;
        bytes[7] = u8::from(self.has_alphas);
        bytes[8] = u8::from(self.has_face_skins);
        bytes[9] = u8::from(self.has_textures);
        bytes[10] = u8::from(self.has_vertex_skins);
        put_u16(&mut bytes, 11, self.x_len);
        put_u16(&mut bytes, 13, self.y_len);
        put_u16(&mut bytes, 15, self.z_len);
        put_u16(&mut bytes, 17, self.face_index_len);
        put_u16(&mut bytes, 19, self.texture_coord_len);
        bytes[21..].copy_from_slice(&Self::MARKER);
        bytes
    }
}

/// Original layout, no marker
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LegacyHeader {
    pub vertex_count: u16,
    pub face_count: u16,
    pub texture_triangles: u8,
    pub has_packed_render: bool,
    pub priority: u8,
    pub has_alphas: bool,
    pub has_face_skins: bool,
    pub has_vertex_skins: bool,
    pub x_len: u16,
    pub y_len: u16,
    pub z_len: u16,
    pub face_index_len: u16,
}

impl LegacyHeader {
    pub const SIZE: usize = 18;

    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        if bytes.len() < Self::SIZE {
            return None;
        }
        Some(Self {
            vertex_count: be_u16(bytes, 0),
            face_count: be_u16(bytes, 2),
            texture_triangles: bytes[4],
            has_packed_render: bytes[5] == 1,
            priority: bytes[6],
            has_alphas: bytes[7] == 1,
            has_face_skins: bytes[8] == 1,
            has_vertex_skins: bytes[9] == 1,
            x_len: be_u16(bytes, 10),
            y_len: be_u16(bytes, 12),
            z_len: be_u16(bytes, 14),
            face_index_len: be_u16(bytes, 16),
        })
    }

    pub fn to_bytes(&self) -> [u8; Self::SIZE] {
        let mut bytes = [0u8; Self::SIZE];
        put_u16(&mut bytes, 0, self.vertex_count);
        put_u16(&mut bytes, 2, self.face_count);
        bytes[4] = self.texture_triangles;
        bytes[5] = u8::from(self.has_packed_render);
        bytes[6] = self.priority;
        bytes[7] = u8::from(self.has_alphas);
        bytes[8] = u8::from(self.has_face_skins);
        bytes[9] = u8::from(self.has_vertex_skins);
        put_u16(&mut bytes, 10, self.x_len);
        put_u16(&mut bytes, 12, self.y_len);
        put_u16(&mut bytes, 14, self.z_len);
        put_u16(&mut bytes, 16, self.face_index_len);
        bytes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_sizes() {
        assert_eq!(V3Header::SIZE, 26);
        assert_eq!(V2Header::SIZE, 23);
        assert_eq!(V1Header::SIZE, 23);
        assert_eq!(LegacyHeader::SIZE, 18);
    }

    #[test]
    fn test_v3_field_positions() {
        let header = V3Header {
            vertex_count: 0x0102,
            face_count: 0x0304,
            texture_triangles: 5,
            has_skin_weights: true,
            vertex_skin_len: 0xABCD,
            ..Default::default()
        };
        let bytes = header.to_bytes();
        assert_eq!(&bytes[..5], &[1, 2, 3, 4, 5]);
        assert_eq!(bytes[11], 1);
        assert_eq!(&bytes[22..], &[0xAB, 0xCD, 0xFF, 0xFD]);
        assert_eq!(V3Header::from_bytes(&bytes), Some(header));
    }

    #[test]
    fn test_flag_bytes_other_than_one_are_false() {
        let mut bytes = LegacyHeader::default().to_bytes();
        bytes[5] = 2;
        bytes[7] = 1;
        let header = LegacyHeader::from_bytes(&bytes).unwrap();
        assert!(!header.has_packed_render);
        assert!(header.has_alphas);
    }

    #[test]
    fn test_short_bytes() {
        assert!(V2Header::from_bytes(&[0u8; 22]).is_none());
        assert!(V1Header::from_bytes(&[0u8; 10]).is_none());
    }

    #[test]
    fn test_markers_match_signatures() {
        assert_eq!(&V2Header::default().to_bytes()[21..], &[0xFF, 0xFE]);
        assert_eq!(&V1Header::default().to_bytes()[21..], &[0xFF, 0xFF]);
    }
}
