use crate::address::{Geometry, GeometryError, MAX_SET_INDEX_BITS};
use crate::config::CacheConfig;

#[test]
fn decodes_set_and_tag() {
    let geometry = Geometry::new(4, 1, 4).unwrap();
    let decoded = geometry.decode(0x7ff000398);
    assert_eq!(decoded.set, 0x9);
    assert_eq!(decoded.tag, 0x7ff0003);
}

#[test]
fn single_set_always_maps_to_zero() {
    let geometry = Geometry::new(0, 4, 3).unwrap();
    for address in [0u64, 7, 8, 0xdead_beef, u64::MAX] {
        let decoded = geometry.decode(address);
        assert_eq!(decoded.set, 0);
        assert_eq!(decoded.tag, address >> 3);
    }
}

#[test]
fn no_offset_bits() {
    let geometry = Geometry::new(1, 1, 0).unwrap();
    assert_eq!((geometry.decode(2).set, geometry.decode(2).tag), (0, 1));
    assert_eq!((geometry.decode(1).set, geometry.decode(1).tag), (1, 0));
}

#[test]
fn full_width_shift_is_zero() {
    let geometry = Geometry::new(0, 1, 64).unwrap();
    let decoded = geometry.decode(u64::MAX);
    assert_eq!((decoded.set, decoded.tag), (0, 0));

    let geometry = Geometry::new(4, 1, 60).unwrap();
    let decoded = geometry.decode(u64::MAX);
    assert_eq!((decoded.set, decoded.tag), (0xf, 0));
}

#[test]
fn rejects_unsupported_geometries() {
    assert_eq!(
        Geometry::new(MAX_SET_INDEX_BITS + 1, 1, 0),
        Err(GeometryError::TooManySets { set_index_bits: MAX_SET_INDEX_BITS + 1 })
    );
    assert_eq!(
        Geometry::new(8, 1, 57),
        Err(GeometryError::AddressTooWide { set_index_bits: 8, block_offset_bits: 57 })
    );
    assert!(matches!(Geometry::new(20, 1 << 10, 0), Err(GeometryError::TooManyLines { .. })));
    assert!(Geometry::new(0, 0, 0).is_ok());
}

#[test]
fn line_cap_applies_to_a_single_set() {
    assert_eq!(
        Geometry::new(0, 1 << 25, 0),
        Err(GeometryError::TooManyLines { num_sets: 1, associativity: 1 << 25 })
    );
    assert!(Geometry::new(0, 1 << 24, 0).is_ok());
}

#[test]
fn negative_parameters_are_configuration_errors() {
    let err = CacheConfig::new(-1, 1, 0).geometry().unwrap_err();
    assert_eq!(err, GeometryError::Negative { parameter: "set index bits (s)", value: -1 });
    assert!(err.to_string().contains("must not be negative"));
    assert!(matches!(CacheConfig::new(1, -2, 0).geometry(), Err(GeometryError::Negative { value: -2, .. })));
    assert!(matches!(CacheConfig::new(1, 2, -3).geometry(), Err(GeometryError::Negative { value: -3, .. })));
    assert!(matches!(CacheConfig::new(1, 2, i64::MAX).geometry(), Err(GeometryError::AddressTooWide { .. })));
}

#[test]
fn config_from_json() {
    let config: CacheConfig = serde_json::from_str(r#"{"set_index_bits": 2, "associativity": 4, "block_offset_bits": 5, "representation": "array"}"#).unwrap();
    assert_eq!(config.representation, crate::config::Representation::Timestamp);
    let geometry = config.geometry().unwrap();
    assert_eq!(geometry.num_sets(), 4);
    assert_eq!(geometry.associativity(), 4);
    assert_eq!(geometry.block_offset_bits(), 5);

    let config: CacheConfig = serde_json::from_str(r#"{"set_index_bits": 0, "associativity": 1, "block_offset_bits": 0}"#).unwrap();
    assert_eq!(config.representation, crate::config::Representation::Linked);
}
