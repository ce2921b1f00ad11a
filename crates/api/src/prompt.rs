// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The fixed preamble sent to the extractor with every message.

const INSTRUCTION: &str = "check leave 1.is really leave, cancel or change 2.what leave type(ลากิจ, ลาป่วย, ลาพักร้อน, ลาคลอด) 3.which days they request to leave";

const OUTPUT_FORMAT: &str = "if really request leave return as json in this format '[{command: \"add or cancel\",leave_type : \"leave type\", date : [\"DD/MM/YYYY ครึ่งวัน or เต็มวัน\", etc..]},...etc]' \n if not really request leave return {[]} dont forget return json in 1 line .\n if input dont have date in text, date should be in format date: ['to_day ครึ่งวัน or เต็มวัน'] and if they give wrong date or that date not exist give date: ['wrong date'] instead , pls remember dont response in another";

const CHANGE_RULE: &str = "if they give cancel leave give them command: cancel,if user give change the leave then return command: add for the new and cancel for the old\n the words that mean change ['สลับ', 'เปลี่ยน', 'เปลี่ยนเป็น', etc..]";

const FEW_SHOT: &str = r#"example user: 24/07/2024 มิกซ์ขอยกเลิกลาพักร้อน 24-26/07/24 (3 วัน) ครับผม เนื่องจาก ฮอดบ้านแล้วครับ answer:[ {"command":  "cancel", "leave_type" : "ลาพักร้อน","date" : ["24/07/2567 เต็มวัน", "25/07/2567 เต็มวัน", "26/07/2567 เต็มวัน"]}] 
 user: แจ้งสลับวันหยุดวันที่ 02/08 หยุดวันที่ 27/07 ค่ะ แจ้งหัวหน้าเรียบร้อยค่ะ answer:[ {"command":  "cancel", "leave_type" : "ลากิจ","date" : ["02/08/2567 เต็มวัน", ]}, {"command":  "add", "leave_type" : "ลากิจ","date" : ["27/07/2567 เต็มวัน"]}]"#;

const MESSAGE_FRAME: &str = "\n this is text to check: ";

/// The text parts of one extraction request, in the order they are sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionPrompt {
    pub parts: Vec<String>,
}

impl ExtractionPrompt {
    /// Builds the prompt for a message: instruction, output format, change
    /// rule and examples, then the framed message text.
    #[must_use]
    pub fn for_message(text: &str) -> Self {
        Self {
            parts: vec![
                INSTRUCTION.to_string(),
                OUTPUT_FORMAT.to_string(),
                CHANGE_RULE.to_string(),
                FEW_SHOT.to_string(),
                format!("{MESSAGE_FRAME}{text}"),
            ],
        }
    }

    /// The framed message text, always the last part.
    #[must_use]
    pub fn message(&self) -> &str {
        self.parts.last().map_or("", String::as_str)
    }
}
