//! Integration tests for common utilities module.

use paranut_soc::common::*;
use paranut_soc::sim::register::Register;
use paranut_soc::sim::signal::SignalTable;

/// Tests width mask generation, including saturation.
#[test]
fn test_width_mask() {
    assert_eq!(width_mask(0), 0);
    assert_eq!(width_mask(1), 1);
    assert_eq!(width_mask(5), 0x1f);
    assert_eq!(width_mask(32), 0xffff_ffff);
    assert_eq!(width_mask(64), u64::MAX);
    assert_eq!(width_mask(100), u64::MAX);
}

/// Tests index and id field widths.
#[test]
fn test_index_bits() {
    assert_eq!(index_bits(1), 0);
    assert_eq!(index_bits(2), 1);
    assert_eq!(index_bits(3), 2);
    assert_eq!(index_bits(4), 2);
    assert_eq!(index_bits(5), 3);
    assert_eq!(index_bits(16), 4);
    assert_eq!(index_bits(64), 6);

    assert_eq!(id_field_width(4), 3);
    assert_eq!(id_field_width(16), 5);
}

/// Tests access type classification.
#[test]
fn test_access_type() {
    assert_eq!(AccessType::from_write_enable(true), AccessType::Write);
    assert_eq!(AccessType::from_write_enable(false), AccessType::Read);
    assert_eq!(AccessType::Read.port_prefix(), "rp");
    assert_eq!(AccessType::Write.port_prefix(), "wp");
}

/// Tests unit naming.
#[test]
fn test_unit_identity() {
    assert_eq!(Unit::Exu(0).to_string(), "exu0");
    assert_eq!(Unit::Lsu(3).to_string(), "lsu3");
    assert_eq!(Unit::Top.to_string(), "top");
}

/// Tests error messages.
#[test]
fn test_error_display() {
    let e = SocError::from(WiringError::MultipleDrivers {
        signal: "x".into(),
        first: Unit::Exu(0),
        second: Unit::Exu(1),
    });
    assert_eq!(e.to_string(), "signal 'x' has multiple drivers: exu0 and exu1");

    let e = SocError::from(SimError::Unsettled { tick: 3, passes: 64 });
    assert!(e.to_string().contains("did not settle"));
}

/// Tests that register values stay invisible until commit.
#[test]
fn test_register_staging() {
    let mut r: Register<u64> = Register::new("r");
    assert_eq!(r.name(), "r");
    assert_eq!(r.get(), None);
    assert!(!r.is_defined());
    assert_eq!(r.read_or(7), 7);

    r.stage(1);
    assert_eq!(r.get(), None);
    r.stage(2);
    r.commit();
    assert_eq!(r.get(), Some(2));

    r.commit();
    assert_eq!(r.get(), Some(2));
}

/// Tests signal truncation and change detection.
#[test]
fn test_signal_table() {
    let mut b = paranut_soc::soc::NetlistBuilder::new();
    let narrow = b.connect("narrow", 4, Unit::Top, &[]);
    let bit = b.connect("bit", 1, Unit::Top, &[]);
    let netlist = b.build().unwrap();

    let mut signals = SignalTable::new(netlist.iter().map(|(_, s)| s.width));
    assert_eq!(signals.len(), 2);
    assert!(!signals.take_changed());

    signals.drive(narrow, 0x1ff);
    assert_eq!(signals.get(narrow), 0xf);
    assert!(signals.take_changed());

    signals.drive(narrow, 0xf);
    assert!(!signals.take_changed());

    signals.drive_bit(bit, true);
    assert!(signals.get_bit(bit));
    assert!(signals.take_changed());
}
