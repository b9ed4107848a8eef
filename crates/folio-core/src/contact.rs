#![forbid(unsafe_code)]

//! Contact form submit flow: validate, mark failures, or hand off to the
//! mail client after a simulated send delay.

use std::time::Duration;

use tracing::{debug, info};

use crate::config::PageConfig;
use crate::controller::Cx;
use crate::form::{FieldId, FormSnapshot, ValidationResult, validate};
use crate::mailto::MailtoLink;
use crate::notify::{Severity, Toaster};
use crate::patch::{DomPatch, ElementRef};
use crate::timer::TimerId;

const ERROR_BORDER: &str = "#ef4444";
const RESTING_BORDER: &str = "#e2e8f0";
const SHAKE: &str = "shake 0.5s ease-in-out";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactTask {
    /// Clear the error marker from a field.
    RevertMarker(FieldId),
    /// Finish the pending send.
    Send,
}

/// What a submit attempt did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    Invalid(ValidationResult),
    Sending,
    /// A send is already pending; the disabled button swallows the submit.
    Ignored,
}

#[derive(Debug)]
struct PendingSend {
    form: FormSnapshot,
    timer: TimerId,
}

#[derive(Debug)]
pub struct ContactFlow {
    recipient: String,
    invalid_message: String,
    success_message: String,
    sending_label: String,
    marker_revert: Duration,
    send_delay: Duration,
    pending: Option<PendingSend>,
    last_link: Option<MailtoLink>,
}

impl ContactFlow {
    pub fn new(config: &PageConfig) -> Self {
        Self {
            recipient: config.recipient.clone(),
            invalid_message: config.invalid_message.clone(),
            success_message: config.success_message.clone(),
            sending_label: config.sending_label.clone(),
            marker_revert: config.marker_revert(),
            send_delay: config.send_delay(),
            pending: None,
            last_link: None,
        }
    }

    #[must_use]
    pub fn is_sending(&self) -> bool {
        self.pending.is_some()
    }

    /// The most recent hand-off, if any.
    #[must_use]
    pub fn last_link(&self) -> Option<&MailtoLink> {
        self.last_link.as_ref()
    }

    pub(crate) fn submit(
        &mut self,
        cx: &mut Cx<'_>,
        toaster: &mut Toaster,
        form: FormSnapshot,
    ) -> SubmitOutcome {
        if self.pending.is_some() {
            debug!("submit ignored while a send is pending");
            return SubmitOutcome::Ignored;
        }

        let result = validate(&form);
        if !result.is_valid() {
            for field in result.failed_fields() {
                let target = ElementRef::Field(field);
                cx.emit(DomPatch::style(target, "border-color", ERROR_BORDER));
                cx.emit(DomPatch::style(target, "animation", SHAKE));
                cx.after(self.marker_revert, ContactTask::RevertMarker(field));
            }
            debug!(
                failed = result.failed_fields().count(),
                "contact form rejected"
            );
            toaster.raise(cx, &self.invalid_message, Severity::Error);
            return SubmitOutcome::Invalid(result);
        }

        cx.emit(DomPatch::SetHtml {
            target: ElementRef::SubmitButton,
            html: self.sending_label.clone(),
        });
        cx.emit(DomPatch::SetDisabled {
            target: ElementRef::SubmitButton,
            disabled: true,
        });
        let timer = cx.after(self.send_delay, ContactTask::Send);
        self.pending = Some(PendingSend { form, timer });
        SubmitOutcome::Sending
    }

    /// Abort a pending send and restore the button. Returns `false` when
    /// nothing was pending.
    pub(crate) fn cancel(&mut self, cx: &mut Cx<'_>) -> bool {
        let Some(pending) = self.pending.take() else {
            return false;
        };
        cx.cancel(pending.timer);
        restore_button(cx, pending.form.submit_label);
        debug!("pending send cancelled");
        true
    }

    pub(crate) fn run(&mut self, cx: &mut Cx<'_>, toaster: &mut Toaster, task: ContactTask) {
        match task {
            ContactTask::RevertMarker(field) => {
                let target = ElementRef::Field(field);
                cx.emit(DomPatch::style(target, "animation", ""));
                cx.emit(DomPatch::style(target, "border-color", RESTING_BORDER));
            }
            ContactTask::Send => {
                let Some(pending) = self.pending.take() else {
                    return;
                };
                let link = MailtoLink::compose(self.recipient.as_str(), &pending.form);
                info!(recipient = %link.recipient, "handing off to mail client");
                cx.emit(DomPatch::Navigate { url: link.to_uri() });
                toaster.raise(cx, &self.success_message, Severity::Success);
                cx.emit(DomPatch::ResetForm);
                restore_button(cx, pending.form.submit_label);
                self.last_link = Some(link);
            }
        }
    }
}

fn restore_button(cx: &mut Cx<'_>, label: String) {
    cx.emit(DomPatch::SetHtml {
        target: ElementRef::SubmitButton,
        html: label,
    });
    cx.emit(DomPatch::SetDisabled {
        target: ElementRef::SubmitButton,
        disabled: false,
    });
}
