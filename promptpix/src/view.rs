use promptpix_controller::{Snapshot, Status};

/// Label shown before each interactive prompt
pub const KEYWORDS_LABEL: &str = "Keywords";

/// Shown while a request is in flight
pub const GENERATING: &str = "Generating...";

/// Render the controller state as a single line of output
pub fn render(snapshot: &Snapshot) -> String {
    match (&snapshot.status, &snapshot.image_url) {
        (Status::Loading(_), _) => GENERATING.to_string(),
        (Status::Failed(failure), Some(previous)) => {
            format!("Error: {} (still showing {previous})", failure.error.user_message())
        }
        (Status::Failed(failure), None) => format!("Error: {}", failure.error.user_message()),
        (Status::Idle, Some(url)) => format!("Image: {url}"),
        (Status::Idle, None) => "No image generated yet".to_string(),
    }
}
