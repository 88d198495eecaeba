use yew::prelude::*;

#[derive(Clone, Copy, PartialEq)]
pub enum StatusKind {
    Success,
    Error,
}

impl StatusKind {
    fn alert_class(&self) -> &'static str {
        match self {
            StatusKind::Success => "alert-success",
            StatusKind::Error => "alert-error",
        }
    }

    fn icon(&self) -> &'static str {
        match self {
            StatusKind::Success => "fas fa-check-circle",
            StatusKind::Error => "fas fa-exclamation-circle",
        }
    }
}

#[derive(Properties, PartialEq)]
pub struct StatusMessageProps {
    pub message: AttrValue,
    pub kind: StatusKind,
}

/// Inline alert for the outcome of a user action.
#[function_component(StatusMessage)]
pub fn status_message(props: &StatusMessageProps) -> Html {
    html! {
        <div class={classes!("alert", props.kind.alert_class())} role="status">
            <i class={props.kind.icon()}></i>
            <span>{&props.message}</span>
        </div>
    }
}
