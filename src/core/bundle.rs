//! Per-core port bundles.
//!
//! A [`CoreBundle`] groups every signal that belongs to one core: the fetch
//! and load-store bundles between the core's units, the core's ports into the
//! shared memory unit, and the lanes connecting it to the control core.
//! Bundles are structural. They hold [`SignalId`]s and never compute.
//!
//! Memory port numbering: read port `i` serves IFU(`i`), read port `N + i`
//! serves LSU(`i`), write port `i` serves LSU(`i`).

use crate::common::data::AccessType;
use crate::common::unit::Unit;
use crate::sim::signal::SignalId;
use crate::soc::interconnect::NetlistBuilder;

/// Width of a machine word and of memory port addresses and data.
pub const WORD_WIDTH: u32 = 32;

/// Byte-select width of a memory port (one bit per word byte).
pub const PORT_BSEL_WIDTH: u32 = WORD_WIDTH / 8;

/// Width of an exception cause code.
pub const CAUSE_WIDTH: u32 = 5;

/// Width of the load-store access size field.
pub const LSU_WIDTH_BITS: u32 = 2;

/// A read port of the shared memory unit.
#[derive(Clone, Debug)]
pub struct ReadPort {
    pub port: usize,
    pub requester: Unit,
    pub rd: SignalId,
    pub direct: SignalId,
    pub bsel: SignalId,
    pub adr: SignalId,
    pub ack: SignalId,
    pub data: SignalId,
}

impl ReadPort {
    fn declare(b: &mut NetlistBuilder, port: usize, requester: Unit) -> Self {
        let name = |s: &str| format!("{}_{}[{}]", AccessType::Read.port_prefix(), s, port);
        let memu = [Unit::Memu];
        let req = [requester];
        Self {
            port,
            requester,
            rd: b.connect(name("rd"), 1, requester, &memu),
            direct: b.connect(name("direct"), 1, requester, &memu),
            bsel: b.connect(name("bsel"), PORT_BSEL_WIDTH, requester, &memu),
            adr: b.connect(name("adr"), WORD_WIDTH, requester, &memu),
            ack: b.connect(name("ack"), 1, Unit::Memu, &req),
            data: b.connect(name("data"), WORD_WIDTH, Unit::Memu, &req),
        }
    }
}

/// A write port of the shared memory unit.
#[derive(Clone, Debug)]
pub struct WritePort {
    pub port: usize,
    pub requester: Unit,
    pub wr: SignalId,
    pub direct: SignalId,
    pub bsel: SignalId,
    pub lres_scond: SignalId,
    pub writeback: SignalId,
    pub invalidate: SignalId,
    pub adr: SignalId,
    pub data: SignalId,
    pub ack: SignalId,
    pub scond_ok: SignalId,
}

impl WritePort {
    fn declare(b: &mut NetlistBuilder, port: usize, requester: Unit) -> Self {
        let name = |s: &str| format!("{}_{}[{}]", AccessType::Write.port_prefix(), s, port);
        let memu = [Unit::Memu];
        let req = [requester];
        Self {
            port,
            requester,
            wr: b.connect(name("wr"), 1, requester, &memu),
            direct: b.connect(name("direct"), 1, requester, &memu),
            bsel: b.connect(name("bsel"), PORT_BSEL_WIDTH, requester, &memu),
            lres_scond: b.connect(name("lres_scond"), 1, requester, &memu),
            writeback: b.connect(name("writeback"), 1, requester, &memu),
            invalidate: b.connect(name("invalidate"), 1, requester, &memu),
            adr: b.connect(name("adr"), WORD_WIDTH, requester, &memu),
            data: b.connect(name("data"), WORD_WIDTH, requester, &memu),
            ack: b.connect(name("ack"), 1, Unit::Memu, &req),
            scond_ok: b.connect(name("scond_ok"), 1, Unit::Memu, &req),
        }
    }
}

/// Control and status signals between a core's EXU and IFU.
#[derive(Clone, Debug)]
pub struct FetchPorts {
    pub next: SignalId,
    pub jump: SignalId,
    pub flush: SignalId,
    pub reset: SignalId,
    pub jump_adr: SignalId,
    pub ir_valid: SignalId,
    pub npc_valid: SignalId,
    pub ir: SignalId,
    pub pc: SignalId,
    pub npc: SignalId,
}

impl FetchPorts {
    fn declare(b: &mut NetlistBuilder, core: usize) -> Self {
        let name = |s: &str| format!("ifu_{}[{}]", s, core);
        let (exu, ifu) = (Unit::Exu(core), Unit::Ifu(core));
        Self {
            next: b.connect(name("next"), 1, exu, &[ifu]),
            jump: b.connect(name("jump"), 1, exu, &[ifu]),
            flush: b.connect(name("flush"), 1, exu, &[ifu]),
            reset: b.connect(name("reset"), 1, exu, &[ifu]),
            jump_adr: b.connect(name("jump_adr"), WORD_WIDTH, exu, &[ifu]),
            ir_valid: b.connect(name("ir_valid"), 1, ifu, &[exu]),
            npc_valid: b.connect(name("npc_valid"), 1, ifu, &[exu]),
            ir: b.connect(name("ir"), WORD_WIDTH, ifu, &[exu]),
            pc: b.connect(name("pc"), WORD_WIDTH, ifu, &[exu]),
            npc: b.connect(name("npc"), WORD_WIDTH, ifu, &[exu]),
        }
    }
}

/// Control and status signals between a core's EXU and LSU.
#[derive(Clone, Debug)]
pub struct LoadStorePorts {
    pub rd: SignalId,
    pub wr: SignalId,
    pub flush: SignalId,
    pub lres_scond: SignalId,
    pub cache_writeback: SignalId,
    pub cache_invalidate: SignalId,
    pub width: SignalId,
    pub exts: SignalId,
    pub adr: SignalId,
    pub wdata: SignalId,
    pub ack: SignalId,
    pub align_err: SignalId,
    pub scond_ok: SignalId,
    pub rdata: SignalId,
    /// Load-reserved link state held by the EXU.
    pub linked: SignalId,
}

impl LoadStorePorts {
    fn declare(b: &mut NetlistBuilder, core: usize) -> Self {
        let name = |s: &str| format!("lsu_{}[{}]", s, core);
        let (exu, lsu) = (Unit::Exu(core), Unit::Lsu(core));
        Self {
            rd: b.connect(name("rd"), 1, exu, &[lsu]),
            wr: b.connect(name("wr"), 1, exu, &[lsu]),
            flush: b.connect(name("flush"), 1, exu, &[lsu]),
            lres_scond: b.connect(name("lres_scond"), 1, exu, &[lsu]),
            cache_writeback: b.connect(name("cache_writeback"), 1, exu, &[lsu]),
            cache_invalidate: b.connect(name("cache_invalidate"), 1, exu, &[lsu]),
            width: b.connect(name("width"), LSU_WIDTH_BITS, exu, &[lsu]),
            exts: b.connect(name("exts"), 1, exu, &[lsu]),
            adr: b.connect(name("adr"), WORD_WIDTH, exu, &[lsu]),
            wdata: b.connect(name("wdata"), WORD_WIDTH, exu, &[lsu]),
            ack: b.connect(name("ack"), 1, lsu, &[exu]),
            align_err: b.connect(name("align_err"), 1, lsu, &[exu]),
            scond_ok: b.connect(name("scond_ok"), 1, lsu, &[exu]),
            rdata: b.connect(name("rdata"), WORD_WIDTH, lsu, &[exu]),
            linked: b.connect(format!("exu_linked[{}]", core), 1, exu, &[lsu]),
        }
    }
}

/// Lanes between one core and the control core (EXU(0)).
///
/// Per-core vectors are carried as one lane per core so that each lane has
/// a single producer and no packing logic exists in the wiring.
#[derive(Clone, Debug)]
pub struct ControlLanes {
    /// Core enable, from the control core.
    pub ce: SignalId,
    /// Loop mode, from the control core.
    pub lm: SignalId,
    /// Broadcast fetch enable, from the control core.
    pub ifaden: SignalId,
    /// Select, from the control core.
    pub xsel: SignalId,
    /// Halt request, toward the control core.
    pub haltreq: SignalId,
    /// Exception pending, toward the control core.
    pub x: SignalId,
    /// Synchronization handshake, toward the control core.
    pub sync: SignalId,
    /// Exception cause and pc, toward the control core. Absent on core 0.
    pub cause: Option<SignalId>,
    pub epc: Option<SignalId>,
    /// Debug request from the debug module.
    pub dbg_req: SignalId,
}

impl ControlLanes {
    fn declare(b: &mut NetlistBuilder, core: usize) -> Self {
        let name = |s: &str| format!("pn_{}[{}]", s, core);
        let cepu = Unit::Exu(0);
        let exu = Unit::Exu(core);
        let (cause, epc) = if core == 0 {
            (None, None)
        } else {
            (
                Some(b.connect(name("cause"), CAUSE_WIDTH, exu, &[cepu])),
                Some(b.connect(name("epc"), WORD_WIDTH, exu, &[cepu])),
            )
        };
        Self {
            ce: b.connect(name("ce"), 1, cepu, &[exu]),
            lm: b.connect(name("lm"), 1, cepu, &[exu]),
            ifaden: b.connect(name("ifaden"), 1, cepu, &[Unit::Ifu(core)]),
            xsel: b.connect(name("xsel"), 1, cepu, &[exu]),
            haltreq: b.connect(name("haltreq"), 1, exu, &[cepu]),
            x: b.connect(name("x"), 1, exu, &[cepu]),
            sync: b.connect(format!("exu_sync[{}]", core), 1, exu, &[cepu]),
            cause,
            epc,
            dbg_req: b.connect(format!("dbg_req[{}]", core), 1, Unit::Dm, &[exu]),
        }
    }
}

/// Every port belonging to one core.
#[derive(Clone, Debug)]
pub struct CoreBundle {
    pub index: usize,
    pub fetch: FetchPorts,
    pub lsu: LoadStorePorts,
    /// Instruction read port (`rp[i]`).
    pub fetch_port: ReadPort,
    /// Data read port (`rp[N + i]`).
    pub data_port: ReadPort,
    /// Data write port (`wp[i]`).
    pub write_port: WritePort,
    pub lanes: ControlLanes,
    /// Broadcast fetch address from the control core. Declared once, on core 0.
    pub ifadr: Option<SignalId>,
}

impl CoreBundle {
    /// Declares all signals of core `index` in an `cores`-core system.
    pub fn declare(b: &mut NetlistBuilder, index: usize, cores: usize) -> Self {
        let ifadr = if index == 0 {
            let listeners: Vec<Unit> = (1..cores).map(Unit::Ifu).collect();
            Some(b.connect("pn_ifadr", WORD_WIDTH, Unit::Exu(0), &listeners))
        } else {
            None
        };
        Self {
            index,
            fetch: FetchPorts::declare(b, index),
            lsu: LoadStorePorts::declare(b, index),
            fetch_port: ReadPort::declare(b, index, Unit::Ifu(index)),
            data_port: ReadPort::declare(b, cores + index, Unit::Lsu(index)),
            write_port: WritePort::declare(b, index, Unit::Lsu(index)),
            lanes: ControlLanes::declare(b, index),
            ifadr,
        }
    }

    /// Returns `true` for the control core.
    pub fn is_control_core(&self) -> bool {
        self.index == 0
    }
}
