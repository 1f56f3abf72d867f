use fpusim_core::common::RegAddr;
use fpusim_core::fpu::client::FpuClient;
use mockall::mock;

mock! {
    pub Client {}
    impl FpuClient for Client {
        fn check_output_availability(&self, addr: RegAddr) -> bool;
        fn write_result(&mut self, addr: RegAddr, value: u64) -> bool;
        fn name(&self) -> String;
    }
}

/// A register-file stand-in that logs every word it receives.
#[derive(Debug, Clone)]
pub struct RecordingClient {
    pub name: String,
    /// Answer to `check_output_availability`.
    pub ready: bool,
    /// Answer to `write_result`; a rejected write is not logged.
    pub accept: bool,
    /// Registers reported unavailable even while `ready` is set.
    pub busy: Vec<RegAddr>,
    pub writes: Vec<(RegAddr, u64)>,
}

impl RecordingClient {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_owned(),
            ready: true,
            accept: true,
            busy: Vec::new(),
            writes: Vec::new(),
        }
    }
}

impl FpuClient for RecordingClient {
    fn check_output_availability(&self, addr: RegAddr) -> bool {
        self.ready && !self.busy.contains(&addr)
    }

    fn write_result(&mut self, addr: RegAddr, value: u64) -> bool {
        if !self.accept {
            return false;
        }
        self.writes.push((addr, value));
        true
    }

    fn name(&self) -> String {
        self.name.clone()
    }
}
