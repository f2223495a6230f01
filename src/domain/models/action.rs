/// Requests from the UI loop to the background actions service.
#[derive(Debug)]
pub enum Action {
    WorkerRequest(String),
}
