//! Invoice export: rasterize the rendered bill with html2canvas, place it on
//! a single A4 page with jsPDF, then download or share the result.
//!
//! Both libraries are loaded by `index.html`; failures come back as opaque
//! `JsValue`s and are given context here before reaching the UI.

use anyhow::{anyhow, Context, Result};
use js_sys::{Array, Function, Object, Promise, Reflect};
use shared::export::{fit_to_page, pdf_file_name, whatsapp_link, PageSize};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Blob, File, FilePropertyBag, HtmlCanvasElement, HtmlElement};

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_name = html2canvas, catch)]
    fn html2canvas(element: &HtmlElement, options: &JsValue) -> Result<Promise, JsValue>;

    #[wasm_bindgen(js_namespace = jspdf, js_name = jsPDF)]
    type JsPdf;

    #[wasm_bindgen(constructor, js_namespace = jspdf, js_class = "jsPDF", catch)]
    fn new(options: &JsValue) -> Result<JsPdf, JsValue>;

    #[wasm_bindgen(method, js_name = addImage, catch)]
    fn add_image(
        this: &JsPdf,
        data_url: &str,
        format: &str,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    ) -> Result<(), JsValue>;

    #[wasm_bindgen(method, catch)]
    fn save(this: &JsPdf, file_name: &str) -> Result<(), JsValue>;

    #[wasm_bindgen(method, js_name = output, catch)]
    fn output_blob(this: &JsPdf, kind: &str) -> Result<Blob, JsValue>;
}

const PDF_MIME: &str = "application/pdf";

fn js_error(value: JsValue) -> anyhow::Error {
    match value.as_string() {
        Some(message) => anyhow!(message),
        None => anyhow!("{:?}", value),
    }
}

fn options(entries: &[(&str, JsValue)]) -> Result<Object> {
    let object = Object::new();
    for (key, value) in entries {
        Reflect::set(&object, &JsValue::from_str(key), value).map_err(js_error)?;
    }
    Ok(object)
}

/// How a bill left the app.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShareOutcome {
    /// The OS share sheet took the PDF file.
    Native,
    /// WhatsApp opened with the message; the PDF was downloaded alongside.
    WhatsAppLink,
}

/// A bill rendered to a one-page PDF.
pub struct RenderedInvoice {
    document: JsPdf,
    file_name: String,
}

impl RenderedInvoice {
    /// Renders the element with id `element_id`.
    pub async fn render(element_id: &str, invoice_number: &str) -> Result<Self> {
        let element = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id(element_id))
            .ok_or_else(|| anyhow!("Nothing to print: #{} not found", element_id))?
            .dyn_into::<HtmlElement>()
            .map_err(|_| anyhow!("#{} is not an HTML element", element_id))?;

        let canvas_options = options(&[
            ("scale", JsValue::from_f64(2.0)),
            ("useCORS", JsValue::TRUE),
            ("backgroundColor", JsValue::from_str("#ffffff")),
        ])?;
        let promise = html2canvas(&element, &canvas_options)
            .map_err(js_error)
            .context("html2canvas is not loaded")?;
        let canvas: HtmlCanvasElement = JsFuture::from(promise)
            .await
            .map_err(js_error)
            .context("Failed to capture the bill")?
            .dyn_into()
            .map_err(|_| anyhow!("html2canvas did not return a canvas"))?;
        let image = canvas
            .to_data_url_with_type("image/png")
            .map_err(js_error)
            .context("Failed to encode the bill image")?;

        let pdf_options = options(&[
            ("orientation", JsValue::from_str("portrait")),
            ("unit", JsValue::from_str("mm")),
            ("format", JsValue::from_str("a4")),
        ])?;
        let document = JsPdf::new(&pdf_options)
            .map_err(js_error)
            .context("jsPDF is not loaded")?;
        let fit = fit_to_page(canvas.width() as f64, canvas.height() as f64, PageSize::A4);
        document
            .add_image(&image, "PNG", fit.x, fit.y, fit.width, fit.height)
            .map_err(js_error)
            .context("Failed to place the bill on the page")?;

        log::debug!(
            target: "pdf",
            "Rendered {}x{} canvas to {:.1}x{:.1} mm",
            canvas.width(),
            canvas.height(),
            fit.width,
            fit.height
        );

        Ok(Self {
            document,
            file_name: pdf_file_name(invoice_number),
        })
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn download(&self) -> Result<()> {
        self.document
            .save(&self.file_name)
            .map_err(js_error)
            .context("Failed to download the PDF")
    }

    fn to_file(&self) -> Result<File> {
        let blob = self.document.output_blob("blob").map_err(js_error)?;
        let bag = FilePropertyBag::new();
        bag.set_type(PDF_MIME);
        File::new_with_blob_sequence_and_options(&Array::of1(&blob), &self.file_name, &bag)
            .map_err(js_error)
            .context("Failed to wrap the PDF as a file")
    }

    /// Hands the PDF to the OS share sheet when the browser can share files,
    /// otherwise (or if sharing fails) opens WhatsApp and downloads the PDF.
    pub async fn share(&self, phone: &str, message: &str) -> Result<ShareOutcome> {
        match self.share_native(message).await {
            Ok(true) => return Ok(ShareOutcome::Native),
            Ok(false) => {}
            Err(e) => log::warn!(target: "pdf", "Native share failed, falling back: {:#}", e),
        }

        let encoded: String = js_sys::encode_uri_component(message).into();
        let link = whatsapp_link(phone, &encoded);
        let window = web_sys::window().ok_or_else(|| anyhow!("No window"))?;
        window
            .open_with_url_and_target(&link, "_blank")
            .map_err(js_error)
            .context("Failed to open WhatsApp")?;
        self.download()?;
        Ok(ShareOutcome::WhatsAppLink)
    }

    async fn share_native(&self, message: &str) -> Result<bool> {
        let navigator = web_sys::window()
            .ok_or_else(|| anyhow!("No window"))?
            .navigator();
        let can_share = Reflect::get(&navigator, &JsValue::from_str("canShare")).map_err(js_error)?;
        let share = Reflect::get(&navigator, &JsValue::from_str("share")).map_err(js_error)?;
        let (Some(can_share), Some(share)) = (
            can_share.dyn_ref::<Function>(),
            share.dyn_ref::<Function>(),
        ) else {
            return Ok(false);
        };

        let files = Array::of1(&JsValue::from(self.to_file()?));
        let data = options(&[
            ("files", files.into()),
            ("title", JsValue::from_str(&self.file_name)),
            ("text", JsValue::from_str(message)),
        ])?;
        let allowed = can_share.call1(&navigator, &data).map_err(js_error)?;
        if !allowed.is_truthy() {
            return Ok(false);
        }

        let promise: Promise = share
            .call1(&navigator, &data)
            .map_err(js_error)?
            .dyn_into()
            .map_err(|_| anyhow!("navigator.share did not return a promise"))?;
        JsFuture::from(promise)
            .await
            .map_err(js_error)
            .context("Share was cancelled or failed")?;
        Ok(true)
    }
}
