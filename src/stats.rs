//! Simulation statistics collection and reporting.
//!
//! Tracks clock edges, settle behavior, interrupt handshakes, and completed
//! bus transfers over a run.

use std::time::Instant;

/// Counters accumulated over a simulation run.
pub struct SimStats {
    start_time: Instant,
    pub cycles: u64,
    pub reset_cycles: u64,

    pub settle_passes: u64,
    pub max_settle_passes: usize,

    pub irq_raised: u64,
    pub irq_acked: u64,
    pub irq_serviced: u64,

    pub bus_reads: u64,
    pub bus_writes: u64,
}

impl Default for SimStats {
    fn default() -> Self {
        Self {
            start_time: Instant::now(),
            cycles: 0,
            reset_cycles: 0,
            settle_passes: 0,
            max_settle_passes: 0,
            irq_raised: 0,
            irq_acked: 0,
            irq_serviced: 0,
            bus_reads: 0,
            bus_writes: 0,
        }
    }
}

impl SimStats {
    /// Records the pass count of one settle phase.
    pub fn record_settle(&mut self, passes: usize) {
        self.settle_passes += passes as u64;
        self.max_settle_passes = self.max_settle_passes.max(passes);
    }

    /// Prints a formatted summary of the run.
    pub fn print(&self) {
        let seconds = self.start_time.elapsed().as_secs_f64();
        let cyc = if self.cycles == 0 { 1 } else { self.cycles };
        let khz = (self.cycles as f64 / seconds) / 1000.0;

        println!("\n==========================================================");
        println!("SOC SIMULATION STATISTICS");
        println!("==========================================================");
        println!("host_seconds             {:.4} s", seconds);
        println!("sim_cycles               {}", self.cycles);
        println!("sim_freq                 {:.2} kHz", khz);
        println!(
            "  cycles.reset           {} ({:.2}%)",
            self.reset_cycles,
            (self.reset_cycles as f64 / cyc as f64) * 100.0
        );
        println!("----------------------------------------------------------");
        println!("SETTLE");
        println!(
            "  settle.avg_passes      {:.2}",
            self.settle_passes as f64 / cyc as f64
        );
        println!("  settle.max_passes      {}", self.max_settle_passes);
        println!("----------------------------------------------------------");
        println!("INTERRUPTS");
        println!("  irq.raised             {}", self.irq_raised);
        println!("  irq.acked              {}", self.irq_acked);
        println!("  irq.serviced           {}", self.irq_serviced);
        println!("----------------------------------------------------------");
        println!("BUS");
        println!("  bus.reads              {}", self.bus_reads);
        println!("  bus.writes             {}", self.bus_writes);
        println!("==========================================================");
    }
}
