use std::time::Duration;

use shared::domain::Quote;

use crate::surface::DisplaySurface;

/// Fade out, swap the content, fade back in.
pub async fn swap_quote(display: &dyn DisplaySurface, quote: &Quote, fade_delay: Duration) {
    display.set_opacity(0.0);
    tokio::time::sleep(fade_delay).await;
    display.set_status(None);
    display.set_content(quote.text(), quote.author());
    display.set_opacity(1.0);
}

/// Failure rendering: stale content goes, the message takes the status slot.
pub fn show_failure(display: &dyn DisplaySurface, message: &str) {
    display.set_content("", "");
    display.set_opacity(1.0);
    display.set_status(Some(message));
}
