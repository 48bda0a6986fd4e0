use super::Report;

pub trait ExternalCommunicator {
    type Error;
    fn is_ready(&self) -> bool;
    fn send_report(&self, report: &Report) -> Result<(), Self::Error>;
}
