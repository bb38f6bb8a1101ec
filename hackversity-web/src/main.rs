//! Hackversity chat page controller: WebAssembly client for the chat view.

mod api;
mod bootstrap;
mod components;
mod config;
mod conversations;
mod csrf;
mod dom;
mod errors;
mod message_flow;
mod navigation;
mod session;
mod typing;
mod view;

#[cfg(all(test, target_arch = "wasm32"))]
mod browser_test;
#[cfg(test)]
mod test_support;

fn main() {
    wasm_logger::init(wasm_logger::Config::default());

    // Route panics through the logger so they show up with the rest of the page's output
    std::panic::set_hook(Box::new(|info| {
        let payload = info
            .payload()
            .downcast_ref::<String>()
            .map(String::as_str)
            .or_else(|| info.payload().downcast_ref::<&str>().copied())
            .unwrap_or("Unknown panic");
        match info.location() {
            Some(location) => log::error!(
                "Panic: {payload}\n  at {}:{}:{}",
                location.file(),
                location.line(),
                location.column()
            ),
            None => log::error!("Panic: {payload}"),
        }
    }));

    log::info!("Starting Hackversity chat");
    bootstrap::start();
}
