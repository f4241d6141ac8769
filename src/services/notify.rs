use anyhow::Context;
use async_trait::async_trait;

use crate::models::Appointment;

#[async_trait]
pub trait NotificationProvider: Send + Sync {
    async fn booking_confirmed(&self, appointment: &Appointment) -> anyhow::Result<()>;
}

/// Posts the booking as an HTML form to a formsubmit-style endpoint. The
/// call is dispatched fire-and-forget after the booking commits, so failures
/// are logged and never shown to the booker.
pub struct FormPostNotifier {
    endpoint: String,
    client: reqwest::Client,
}

impl FormPostNotifier {
    pub fn new(endpoint: String) -> Self {
        Self {
            endpoint,
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl NotificationProvider for FormPostNotifier {
    async fn booking_confirmed(&self, appointment: &Appointment) -> anyhow::Result<()> {
        let subject = format!("Nueva Reserva: {}", appointment.name);
        let reason = appointment.reason.clone().unwrap_or_default();

        self.client
            .post(&self.endpoint)
            .form(&[
                ("_subject", subject.as_str()),
                ("_template", "table"),
                ("_captcha", "false"),
                ("nombre_paciente", appointment.name.as_str()),
                ("email_paciente", appointment.email.as_str()),
                ("telefono_paciente", appointment.phone.as_str()),
                ("fecha_reserva", appointment.date_display.as_str()),
                ("hora_reserva", appointment.time.as_str()),
                ("motivo_consulta", reason.as_str()),
            ])
            .send()
            .await
            .context("failed to post booking notification")?
            .error_for_status()
            .context("notification endpoint returned error")?;

        Ok(())
    }
}

/// Used when no NOTIFY_URL is configured.
pub struct NullNotifier;

#[async_trait]
impl NotificationProvider for NullNotifier {
    async fn booking_confirmed(&self, _appointment: &Appointment) -> anyhow::Result<()> {
        Ok(())
    }
}
