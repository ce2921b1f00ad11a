// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::auth::verify_token;
use crate::error::ApiError;
use crate::request_response::{SlashCommandForm, SlashCommandResponse};

/// The company's leave conditions, shown by `/leave-condition`.
pub const LEAVE_CONDITION_TEXT: &str = "             เงื่อนไขการลาหยุด
   ลาป่วยได้ 30 วัน/ปี :pill: 
    *มากกว่า 2 วันขึ้นไป ต้องมีใบรับรองแพทย์
   ลากิจ        5 วัน/ปี :luggage: [ผ่านโปรเท่านั้น] 
    *ต้องแจ้งล่วงหน้าอย่างน้อย 2 วันขึ้นไป
   ลาพักร้อน  6 วัน/ปี :airplane: 
    *เมื่อทำงานครบ 2 เดือน สามารถลาได้ 1 วัน
      [ไม่ผ่านโปร] แจ้งล่วงหน้า 45 วัน
      [  ผ่านโปร  ] แจ้งล่วงหน้า 30 วัน
    ";

/// Answers the leave-condition slash command.
///
/// # Errors
///
/// Returns `ApiError::AuthRejected` if the form's token does not match.
pub fn leave_condition(
    verification_token: &str,
    form: &SlashCommandForm,
) -> Result<SlashCommandResponse, ApiError> {
    verify_token(verification_token, form.token.as_deref())?;

    Ok(SlashCommandResponse {
        response_type: String::from("in_channel"),
        text: LEAVE_CONDITION_TEXT.to_string(),
    })
}
