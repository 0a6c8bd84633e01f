//! Integration tests for the bus interface adapter and the bus slave model.

use paranut_soc::common::data::AccessType;
use paranut_soc::common::error::{SimError, SocError};
use paranut_soc::config::Config;
use paranut_soc::soc::busif::{check_response, translate, BusResponse, MemuRequest};
use paranut_soc::soc::{Soc, SocBuilder};

fn config_with_latency(latency: u64) -> Config {
    let mut config = Config::default();
    config.memory.latency = latency;
    config
}

/// Tests that an idle request leaves the bus idle.
#[test]
fn test_translate_idle() {
    let req = MemuRequest {
        req: false,
        we: true,
        bsel: 0xf,
        adr: 0x40,
        wdata: 0x1234,
    };
    let resp = BusResponse {
        ack: true,
        ..BusResponse::default()
    };
    let (master, memu) = translate(&req, &resp, 0xf);
    assert!(!master.cyc);
    assert!(!master.stb);
    assert!(!master.we);
    assert_eq!(master.sel, 0);
    assert_eq!(master.access(), None);
    assert!(!memu.ack);
}

/// Tests a write request passing through to the master pins.
#[test]
fn test_translate_write() {
    let req = MemuRequest {
        req: true,
        we: true,
        bsel: 0b0011,
        adr: 0x1000,
        wdata: 0xcafe,
    };
    let (master, memu) = translate(&req, &BusResponse::default(), 0xf);
    assert!(master.cyc && master.stb && master.we);
    assert_eq!(master.sel, 0b0011);
    assert_eq!(master.adr, 0x1000);
    assert_eq!(master.dat, 0xcafe);
    assert_eq!(master.access(), Some(AccessType::Write));
    assert!(!memu.ack);
}

/// Tests that the slave's ack and data reach the memory unit.
#[test]
fn test_translate_read_ack() {
    let req = MemuRequest {
        req: true,
        we: false,
        bsel: 0xff,
        adr: 0x8,
        wdata: 0,
    };
    let resp = BusResponse {
        ack: true,
        rdata: 0xdead_beef,
        ..BusResponse::default()
    };
    let (master, memu) = translate(&req, &resp, 0xf);
    assert_eq!(master.sel, 0xf);
    assert_eq!(master.access(), Some(AccessType::Read));
    assert!(memu.ack);
    assert_eq!(memu.rdata, 0xdead_beef);
}

/// Tests that err and rty are flagged instead of passed through.
#[test]
fn test_check_response_flags_err_and_rty() {
    assert!(check_response(&BusResponse::default(), 0).is_ok());

    let err = BusResponse {
        err: true,
        ..BusResponse::default()
    };
    assert_eq!(
        check_response(&err, 7),
        Err(SimError::UnsupportedBusResponse {
            tick: 7,
            error: true,
            retry: false
        })
    );

    let rty = BusResponse {
        rty: true,
        ..BusResponse::default()
    };
    assert!(matches!(
        check_response(&rty, 3),
        Err(SimError::UnsupportedBusResponse { retry: true, .. })
    ));
}

/// Tests that an err response from the environment stops the simulation.
#[test]
fn test_err_response_fails_tick() {
    let mut soc = Soc::new(&Config::default()).unwrap();
    soc.reset().unwrap();
    soc.run(2).unwrap();

    soc.drive("err_i", 1).unwrap();
    let result = soc.tick();
    assert!(matches!(
        result,
        Err(SocError::Sim(SimError::UnsupportedBusResponse { error: true, .. }))
    ));
}

/// Tests a write followed by a read through the adapter and the slave.
#[test]
fn test_write_then_read_through_slave() {
    let config = config_with_latency(2);
    let mut soc = SocBuilder::new(&config).unwrap().with_memory().build().unwrap();
    soc.reset().unwrap();

    soc.drive("bif_adr", 0x100).unwrap();
    soc.drive("bif_wdata", 0xdead_beef).unwrap();
    soc.drive("bif_bsel", 0xf).unwrap();
    soc.drive("bif_we", 1).unwrap();
    soc.drive("bif_req", 1).unwrap();

    assert_eq!(soc.peek("cyc_o").unwrap(), 1);
    assert_eq!(soc.peek("we_o").unwrap(), 1);
    assert_eq!(soc.peek("bif_ack").unwrap(), 0);

    soc.run(2).unwrap();
    assert_eq!(soc.peek("bif_ack").unwrap(), 1);

    soc.tick().unwrap();
    soc.drive("bif_req", 0).unwrap();
    assert_eq!(soc.peek("bif_ack").unwrap(), 0);
    assert_eq!(soc.peek("cyc_o").unwrap(), 0);

    let slave = soc.bus_slave().unwrap();
    assert_eq!(slave.memory().read(0x100), 0xdead_beef);
    assert_eq!(slave.transfers(), (0, 1));
    assert_eq!(soc.stats().bus_writes, 1);

    soc.drive("bif_we", 0).unwrap();
    soc.drive("bif_req", 1).unwrap();
    soc.run(2).unwrap();
    assert_eq!(soc.peek("bif_ack").unwrap(), 1);
    assert_eq!(soc.peek("bif_rdata").unwrap(), 0xdead_beef);

    soc.tick().unwrap();
    soc.drive("bif_req", 0).unwrap();
    assert_eq!(soc.bus_slave().unwrap().transfers(), (1, 1));
    assert_eq!(soc.stats().bus_reads, 1);
}

/// Tests that byte selects merge partial writes.
#[test]
fn test_partial_write() {
    let mut soc = SocBuilder::new(&config_with_latency(1))
        .unwrap()
        .with_memory()
        .build()
        .unwrap();
    soc.reset().unwrap();

    for (data, sel) in [(0x1111_1111u64, 0xfu64), (0x0000_2200, 0b0010)] {
        soc.drive("bif_adr", 0x20).unwrap();
        soc.drive("bif_wdata", data).unwrap();
        soc.drive("bif_bsel", sel).unwrap();
        soc.drive("bif_we", 1).unwrap();
        soc.drive("bif_req", 1).unwrap();
        soc.tick().unwrap();
        assert_eq!(soc.peek("bif_ack").unwrap(), 1);
        soc.tick().unwrap();
        soc.drive("bif_req", 0).unwrap();
    }

    assert_eq!(soc.bus_slave().unwrap().memory().read(0x20), 0x1111_2211);
}

/// Tests that signals driven by the adapter cannot be assigned by the harness.
#[test]
fn test_adapter_outputs_not_harness_driven() {
    let mut soc = Soc::new(&Config::default()).unwrap();
    assert!(soc.drive("cyc_o", 1).is_err());
    assert!(soc.drive("bif_ack", 1).is_err());
}
