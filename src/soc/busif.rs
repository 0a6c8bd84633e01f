//! Bus Interface Adapter.
//!
//! Presents the memory unit's internal request/acknowledge handshake as a
//! synchronous bus master (cycle, strobe, write enable, byte select, address,
//! data out; acknowledge, error, retry, data in). The adapter keeps no state:
//! one transaction is outstanding at a time and is fully described by the
//! current tick's signals, with all sequencing left to the memory unit.
//!
//! Only `ack` terminates a cycle. `err` and `rty` are wired but have no
//! defined recovery; the environment must not assert them. If it does,
//! evaluation fails with [`SimError::UnsupportedBusResponse`] instead of
//! producing plausible-looking output.

use crate::common::bits::width_mask;
use crate::common::data::AccessType;
use crate::common::error::SimError;
use crate::common::unit::Unit;
use crate::core::bundle::WORD_WIDTH;
use crate::sim::kernel::TickContext;
use crate::sim::signal::{SignalId, SignalTable};
use crate::soc::interconnect::NetlistBuilder;
use crate::soc::traits::Component;

/// A transfer request from the memory unit.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MemuRequest {
    pub req: bool,
    pub we: bool,
    pub bsel: u64,
    pub adr: u64,
    pub wdata: u64,
}

/// Termination and read data from the bus slave.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BusResponse {
    pub ack: bool,
    pub err: bool,
    pub rty: bool,
    pub rdata: u64,
}

/// Master-side bus outputs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BusMaster {
    pub cyc: bool,
    pub stb: bool,
    pub we: bool,
    pub sel: u64,
    pub adr: u64,
    pub dat: u64,
}

impl BusMaster {
    /// Direction of the cycle currently on the bus, if any.
    pub fn access(&self) -> Option<AccessType> {
        self.cyc.then(|| AccessType::from_write_enable(self.we))
    }
}

/// Handshake returned to the memory unit.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MemuResponse {
    pub ack: bool,
    pub rdata: u64,
}

/// Translates one tick's handshake in both directions.
///
/// `sel_mask` limits byte selects to the bus width.
pub fn translate(req: &MemuRequest, resp: &BusResponse, sel_mask: u64) -> (BusMaster, MemuResponse) {
    let master = BusMaster {
        cyc: req.req,
        stb: req.req,
        we: req.req && req.we,
        sel: if req.req { req.bsel & sel_mask } else { 0 },
        adr: req.adr,
        dat: req.wdata,
    };
    let memu = MemuResponse {
        ack: req.req && resp.ack,
        rdata: resp.rdata,
    };
    (master, memu)
}

/// Rejects responses outside the supported protocol subset.
pub fn check_response(resp: &BusResponse, tick: u64) -> Result<(), SimError> {
    if resp.err || resp.rty {
        log::error!(
            "tick {}: bus slave signalled err={} rty={}; no recovery is defined",
            tick,
            resp.err,
            resp.rty
        );
        return Err(SimError::UnsupportedBusResponse {
            tick,
            error: resp.err,
            retry: resp.rty,
        });
    }
    Ok(())
}

/// Internal handshake with the memory unit and the external master pins.
#[derive(Clone, Debug)]
pub struct BusPorts {
    pub req: SignalId,
    pub we: SignalId,
    pub bsel: SignalId,
    pub adr: SignalId,
    pub wdata: SignalId,
    pub ack: SignalId,
    pub rdata: SignalId,
    pub pins: BusPins,
    /// Data bus width in bits.
    pub width: u32,
}

/// External bus master pins.
#[derive(Clone, Debug)]
pub struct BusPins {
    pub cyc_o: SignalId,
    pub stb_o: SignalId,
    pub we_o: SignalId,
    pub sel_o: SignalId,
    pub adr_o: SignalId,
    pub dat_o: SignalId,
    pub ack_i: SignalId,
    pub err_i: SignalId,
    pub rty_i: SignalId,
    pub dat_i: SignalId,
}

impl BusPorts {
    pub(crate) fn declare(b: &mut NetlistBuilder, width: u32) -> Self {
        let sel_width = width / 8;
        let (memu, busif, top) = ([Unit::Memu], [Unit::BusIf], [Unit::Top]);
        let pins = BusPins {
            cyc_o: b.connect("cyc_o", 1, Unit::BusIf, &top),
            stb_o: b.connect("stb_o", 1, Unit::BusIf, &top),
            we_o: b.connect("we_o", 1, Unit::BusIf, &top),
            sel_o: b.connect("sel_o", sel_width, Unit::BusIf, &top),
            adr_o: b.connect("adr_o", WORD_WIDTH, Unit::BusIf, &top),
            dat_o: b.connect("dat_o", width, Unit::BusIf, &top),
            ack_i: b.connect("ack_i", 1, Unit::Top, &busif),
            err_i: b.connect("err_i", 1, Unit::Top, &busif),
            rty_i: b.connect("rty_i", 1, Unit::Top, &busif),
            dat_i: b.connect("dat_i", width, Unit::Top, &busif),
        };
        Self {
            req: b.connect("bif_req", 1, Unit::Memu, &busif),
            we: b.connect("bif_we", 1, Unit::Memu, &busif),
            bsel: b.connect("bif_bsel", sel_width, Unit::Memu, &busif),
            adr: b.connect("bif_adr", WORD_WIDTH, Unit::Memu, &busif),
            wdata: b.connect("bif_wdata", width, Unit::Memu, &busif),
            ack: b.connect("bif_ack", 1, Unit::BusIf, &memu),
            rdata: b.connect("bif_rdata", width, Unit::BusIf, &memu),
            pins,
            width,
        }
    }
}

/// The bus interface adapter component.
pub struct BusInterfaceAdapter {
    ports: BusPorts,
    sel_mask: u64,
}

impl BusInterfaceAdapter {
    pub fn new(ports: BusPorts) -> Self {
        let sel_mask = width_mask(ports.width / 8);
        Self { ports, sel_mask }
    }

    fn request(&self, signals: &SignalTable) -> MemuRequest {
        MemuRequest {
            req: signals.get_bit(self.ports.req),
            we: signals.get_bit(self.ports.we),
            bsel: signals.get(self.ports.bsel),
            adr: signals.get(self.ports.adr),
            wdata: signals.get(self.ports.wdata),
        }
    }

    fn response(&self, signals: &SignalTable) -> BusResponse {
        let pins = &self.ports.pins;
        BusResponse {
            ack: signals.get_bit(pins.ack_i),
            err: signals.get_bit(pins.err_i),
            rty: signals.get_bit(pins.rty_i),
            rdata: signals.get(pins.dat_i),
        }
    }
}

impl Component for BusInterfaceAdapter {
    fn name(&self) -> &str {
        "busif"
    }

    fn unit(&self) -> Unit {
        Unit::BusIf
    }

    fn drives(&self) -> Vec<SignalId> {
        let pins = &self.ports.pins;
        vec![
            pins.cyc_o,
            pins.stb_o,
            pins.we_o,
            pins.sel_o,
            pins.adr_o,
            pins.dat_o,
            self.ports.ack,
            self.ports.rdata,
        ]
    }

    fn evaluate(&self, signals: &mut SignalTable, ctx: &TickContext) -> Result<(), SimError> {
        let resp = self.response(signals);
        check_response(&resp, ctx.tick)?;

        let (master, memu) = translate(&self.request(signals), &resp, self.sel_mask);
        let pins = &self.ports.pins;
        signals.drive_bit(pins.cyc_o, master.cyc);
        signals.drive_bit(pins.stb_o, master.stb);
        signals.drive_bit(pins.we_o, master.we);
        signals.drive(pins.sel_o, master.sel);
        signals.drive(pins.adr_o, master.adr);
        signals.drive(pins.dat_o, master.dat);
        signals.drive_bit(self.ports.ack, memu.ack);
        signals.drive(self.ports.rdata, memu.rdata);
        Ok(())
    }
}
