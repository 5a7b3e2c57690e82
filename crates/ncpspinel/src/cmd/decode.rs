use ncpspinel_controller::{decode_value_is, PropertyValue};
use ncpspinel_wire::command::{command_name, CMD_PROP_VALUE_IS};
use ncpspinel_wire::decode_frame;
use ncpspinel_wire::property::property_name;

use crate::cmd::DecodeArgs;
use crate::exit::{wire_error, CliError, CliResult, SUCCESS, USAGE};
use crate::output::{print_record, FrameOutput, OutputFormat};

pub fn run(args: DecodeArgs, format: OutputFormat) -> CliResult<i32> {
    let out = describe_frame(&args.frame)?;
    print_record(&out, format);
    Ok(SUCCESS)
}

fn describe_frame(input: &str) -> CliResult<FrameOutput> {
    let compact: String = input.split_whitespace().collect();
    let raw = hex::decode(compact)
        .map_err(|err| CliError::new(USAGE, format!("frame is not valid hex: {err}")))?;
    let frame = decode_frame(&raw).map_err(|err| wire_error("decode failed", err))?;

    let value = match (frame.command, frame.key) {
        (CMD_PROP_VALUE_IS, Some(key)) => decode_value_is(key, &frame.payload)
            .map_err(|err| wire_error("decode failed", err))?
            .map(|value| match value {
                PropertyValue::Role(role) => role.to_string(),
                PropertyValue::LastStatus(status) => status.to_string(),
            }),
        _ => None,
    };

    Ok(FrameOutput {
        header: frame.header.as_u8(),
        iid: frame.header.iid().get(),
        tid: frame.header.tid().get(),
        command: command_name(frame.command),
        command_id: frame.command,
        key: frame.key.map(property_name),
        key_id: frame.key,
        payload: hex::encode(&frame.payload),
        value,
    })
}

#[cfg(test)]
mod tests {
    use crate::exit::DATA_INVALID;

    use super::*;

    #[test]
    fn role_notification_is_described() {
        let out = describe_frame("80 06 43 03").unwrap();
        assert_eq!(out.tid, 0);
        assert_eq!(out.command, "PROP_VALUE_IS");
        assert_eq!(out.key, Some("NET_ROLE"));
        assert_eq!(out.payload, "03");
        assert_eq!(out.value.as_deref(), Some("leader"));
    }

    #[test]
    fn status_reply_is_described() {
        let out = describe_frame("83060004").unwrap();
        assert_eq!(out.tid, 3);
        assert_eq!(out.value.as_deref(), Some("INVALID_STATE"));
    }

    #[test]
    fn net_clear_has_no_key() {
        let out = describe_frame("910a").unwrap();
        assert_eq!(out.iid, 1);
        assert_eq!(out.tid, 1);
        assert_eq!(out.key, None);
        assert_eq!(out.value, None);
    }

    #[test]
    fn malformed_frames_are_data_errors() {
        assert_eq!(describe_frame("00").unwrap_err().code, DATA_INVALID);
        assert_eq!(describe_frame("zz").unwrap_err().code, USAGE);
    }
}
