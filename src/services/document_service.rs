// src/services/document_service.rs

use genpdf::{elements, style, Element};
use image::Luma;
use qrcode::QrCode;

use crate::{common::error::AppError, models::payment::PaymentDetail};

const RESTAURANT_NAME: &str = "RESTAURANTE";

#[derive(Clone)]
pub struct DocumentService {
    font_dir: String,
}

impl DocumentService {
    pub fn new(font_dir: String) -> Self {
        Self { font_dir }
    }

    /// Recibo em PDF de um pagamento concluído. A renderização roda fora do runtime async.
    pub async fn render_receipt(&self, detail: PaymentDetail) -> Result<Vec<u8>, AppError> {
        let font_dir = self.font_dir.clone();
        tokio::task::spawn_blocking(move || build_receipt(&font_dir, &detail))
            .await
            .map_err(|e| anyhow::anyhow!("Falha na thread de renderização do PDF: {}", e))?
    }
}

fn internal(e: impl std::fmt::Display) -> AppError {
    AppError::InternalServerError(anyhow::Error::msg(e.to_string()))
}

fn build_receipt(font_dir: &str, detail: &PaymentDetail) -> Result<Vec<u8>, AppError> {
    let font_family = genpdf::fonts::from_files(font_dir, "Roboto", None)
        .map_err(|_| AppError::FontNotFound(format!("Fonte não encontrada na pasta {}", font_dir)))?;

    let payment = &detail.payment;

    let mut doc = genpdf::Document::new(font_family);
    doc.set_title(format!("Recibo {}", payment.transaction_ref));
    let mut decorator = genpdf::SimplePageDecorator::new();
    decorator.set_margins(10);
    doc.set_page_decorator(decorator);

    // --- CABEÇALHO ---
    doc.push(elements::Paragraph::new(RESTAURANT_NAME).styled(style::Style::new().bold().with_font_size(18)));
    doc.push(elements::Break::new(1.5));

    doc.push(
        elements::Paragraph::new(format!("RECIBO {}", payment.transaction_ref))
            .styled(style::Style::new().bold().with_font_size(14)),
    );
    doc.push(elements::Paragraph::new(format!(
        "Data: {}",
        payment.payment_date.format("%d/%m/%Y %H:%M")
    )));
    doc.push(elements::Paragraph::new(format!("Forma de pagamento: {:?}", payment.method)));

    if let Some(order) = &detail.order {
        doc.push(elements::Paragraph::new(format!("Pedido: {}", order.id)));
    }

    doc.push(elements::Break::new(2));

    // --- ITENS ---
    // Pesos das colunas: Prato (4), Qtd (1), Unitário (2), Total (2)
    let mut table = elements::TableLayout::new(vec![4, 1, 2, 2]);
    table.set_cell_decorator(elements::FrameCellDecorator::new(true, true, false));

    let style_bold = style::Style::new().bold();
    table
        .row()
        .element(elements::Paragraph::new("Prato").styled(style_bold))
        .element(elements::Paragraph::new("Qtd").styled(style_bold))
        .element(elements::Paragraph::new("Unitário").styled(style_bold))
        .element(elements::Paragraph::new("Total").styled(style_bold))
        .push()
        .map_err(internal)?;

    for item in &detail.items {
        table
            .row()
            .element(elements::Paragraph::new(item.dish_name.clone()))
            .element(elements::Paragraph::new(item.quantity.to_string()))
            .element(elements::Paragraph::new(format!("{:.2}", item.unit_price)))
            .element(elements::Paragraph::new(format!("{:.2}", item.line_total)))
            .push()
            .map_err(internal)?;
    }

    doc.push(table);
    doc.push(elements::Break::new(2));

    // --- TOTAIS ---
    for (label, value, bold) in [
        ("Subtotal", detail.total, false),
        ("Desconto", payment.discount, false),
        ("TOTAL PAGO", payment.amount, true),
    ] {
        let mut paragraph = elements::Paragraph::new(format!("{}: {:.2}", label, value));
        paragraph.set_alignment(genpdf::Alignment::Right);
        let paragraph_style = if bold {
            style::Style::new().bold().with_font_size(12)
        } else {
            style::Style::new()
        };
        doc.push(paragraph.styled(paragraph_style));
    }

    doc.push(elements::Break::new(2));

    // --- QR CODE DA TRANSAÇÃO ---
    let code = QrCode::new(payment.transaction_ref.as_bytes()).map_err(internal)?;
    let image_buffer = code.render::<Luma<u8>>().build();
    let dynamic_image = image::DynamicImage::ImageLuma8(image_buffer);

    let pdf_image = elements::Image::from_dynamic_image(dynamic_image)
        .map_err(internal)?
        .with_scale(genpdf::Scale::new(0.5, 0.5));
    doc.push(pdf_image);

    let mut buffer = Vec::new();
    doc.render(&mut buffer).map_err(internal)?;

    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::payment::{Payment, PaymentMethod, PaymentStatus};
    use chrono::Utc;
    use rust_decimal::Decimal;
    use uuid::Uuid;

    fn detail() -> PaymentDetail {
        let now = Utc::now();
        PaymentDetail {
            payment: Payment {
                id: Uuid::new_v4(),
                order_id: None,
                method: PaymentMethod::Cash,
                status: PaymentStatus::Completed,
                transaction_ref: "TXN-ABCDEF012345".to_string(),
                amount: Decimal::from(20),
                discount: Decimal::from(5),
                user_coupon_id: None,
                payment_date: now,
                created_at: now,
            },
            order: None,
            items: Vec::new(),
            total: Decimal::from(25),
        }
    }

    #[tokio::test]
    async fn missing_fonts_are_reported() {
        let service = DocumentService::new("./no-such-font-dir".to_string());
        let err = service.render_receipt(detail()).await.unwrap_err();
        assert!(matches!(err, AppError::FontNotFound(_)));
    }
}
