use chrono::NaiveTime;
use shared::models::MessageRole;
use web_sys::Element;
use yew::{Html, Properties, classes, function_component, html, use_effect_with, use_node_ref};

/// One rendered chat message. Never changes after it is created.
#[derive(Properties, PartialEq, Clone, Debug)]
pub struct Bubble {
    pub text: String,
    pub role: MessageRole,
    pub time_label: String,
}

impl Bubble {
    /// Bubble stamped with the browser's current local time.
    pub fn now(text: impl Into<String>, role: MessageRole) -> Self {
        Self {
            text: text.into(),
            role,
            time_label: time_label(local_time()),
        }
    }
}

/// Class set on the bubble's host element next to `message`.
pub const fn bubble_class(role: MessageRole) -> &'static str {
    match role {
        MessageRole::User => "user",
        MessageRole::Assistant => "ai",
    }
}

const fn avatar_icon(role: MessageRole) -> &'static str {
    match role {
        MessageRole::User => "fa-user-ninja",
        MessageRole::Assistant => "fa-shield-alt",
    }
}

/// Two-digit hour and minute with an AM/PM marker, e.g. `09:05 PM`.
pub fn time_label(time: NaiveTime) -> String {
    time.format("%I:%M %p").to_string()
}

#[cfg(target_arch = "wasm32")]
fn local_time() -> NaiveTime {
    let now = js_sys::Date::new_0();
    NaiveTime::from_hms_opt(now.get_hours(), now.get_minutes(), now.get_seconds())
        .unwrap_or_default()
}

#[cfg(not(target_arch = "wasm32"))]
fn local_time() -> NaiveTime {
    chrono::Local::now().time()
}

#[function_component(MessageBubble)]
pub fn message_bubble(props: &Bubble) -> Html {
    let avatar = use_node_ref();

    // Keep the newest bubble in view once it is in the DOM.
    {
        let avatar = avatar.clone();
        use_effect_with((), move |()| {
            if let Some(list) = avatar
                .cast::<Element>()
                .and_then(|node| node.parent_element())
                .and_then(|host| host.parent_element())
            {
                list.set_scroll_top(list.scroll_height());
            }
            || ()
        });
    }

    html! {
        <>
            <div class="message-avatar" ref={avatar}>
                <i class={classes!("fas", avatar_icon(props.role))}></i>
            </div>
            <div class="message-content">
                <div class="message-text">
                    { for props.text.split('\n').enumerate().map(|(index, line)| html! {
                        <>
                            if index > 0 { <br /> }
                            { line.to_string() }
                        </>
                    }) }
                </div>
                <div class="message-time">{ props.time_label.clone() }</div>
            </div>
        </>
    }
}
