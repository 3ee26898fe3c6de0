use thiserror::Error;

/// Sentinel byte opening every AQ-S frame.
pub const START_MARKER: u8 = 0x7E;
/// Sentinel byte closing every AQ-S frame.
pub const END_MARKER: u8 = 0xEF;

const MIN_FRAME_LEN: usize = 5;
const FRAME_OVERHEAD: usize = 4;
const MAX_PAYLOAD_LEN: usize = u8::MAX as usize - 1;

/// Errors returned by frame encoding and decoding.
#[derive(Debug, Error, Clone, Eq, PartialEq)]
pub enum FrameCodecError {
    /// The payload cannot be described by the one-byte length field.
    #[error("payload is too large: {payload_len} bytes exceeds max {max_payload_len}")]
    PayloadTooLarge {
        payload_len: usize,
        max_payload_len: usize,
    },
    /// The buffer has fewer than the mandatory 5 frame bytes.
    #[error("frame is too short: expected at least {MIN_FRAME_LEN} bytes, got {actual}")]
    TooShort { actual: usize },
    /// The first byte is not the start marker.
    #[error("bad start marker: expected 0x{START_MARKER:02X}, got 0x{actual:02X}")]
    BadStartMarker { actual: u8 },
    /// The last byte is not the end marker.
    #[error("bad end marker: expected 0x{END_MARKER:02X}, got 0x{actual:02X}")]
    BadEndMarker { actual: u8 },
    /// The length byte disagrees with the number of bytes in the buffer.
    #[error("frame length mismatch: declared {declared} content bytes but frame carries {actual}")]
    LengthMismatch { declared: usize, actual: usize },
    /// The trailing checksum byte does not match the frame content.
    #[error("checksum mismatch: computed 0x{computed:02X}, frame carries 0x{actual:02X}")]
    ChecksumMismatch { computed: u8, actual: u8 },
}

/// Decoded view over a validated frame.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct RawFrame<'a> {
    opcode: u8,
    payload: &'a [u8],
}

impl RawFrame<'_> {
    /// Returns the opcode byte.
    ///
    /// ```
    /// use aqs::FrameCodec;
    ///
    /// let frame = FrameCodec::decode(&[0x7E, 0x02, 0x01, 0x01, 0x00, 0xEF])?;
    /// assert_eq!(0x01, frame.opcode());
    /// # Ok::<(), aqs::FrameCodecError>(())
    /// ```
    #[must_use]
    pub fn opcode(&self) -> u8 {
        self.opcode
    }

    /// Returns the payload bytes between opcode and checksum.
    ///
    /// ```
    /// use aqs::FrameCodec;
    ///
    /// let frame = FrameCodec::decode(&[0x7E, 0x02, 0x01, 0x01, 0x00, 0xEF])?;
    /// assert_eq!(&[0x01], frame.payload());
    /// # Ok::<(), aqs::FrameCodecError>(())
    /// ```
    #[must_use]
    pub fn payload(&self) -> &[u8] {
        self.payload
    }
}

/// Encodes and decodes AQ-S wire frames.
///
/// The wire unit in both directions is
/// `[0x7E][length][opcode][payload…][checksum][0xEF]`, where `length`
/// counts the opcode plus payload bytes and the checksum is the running
/// XOR of opcode and payload.
pub struct FrameCodec;

impl FrameCodec {
    /// Computes the one-byte checksum over opcode and payload.
    ///
    /// ```
    /// use aqs::FrameCodec;
    ///
    /// assert_eq!(0x00, FrameCodec::checksum(0x01, &[0x01]));
    /// assert_eq!(0x73, FrameCodec::checksum(0x04, &[0xFF, 0x88, 0x00]));
    /// ```
    #[must_use]
    pub fn checksum(opcode: u8, payload: &[u8]) -> u8 {
        payload
            .iter()
            .fold(opcode, |accumulator, byte| accumulator ^ byte)
    }

    /// Assembles a ready-to-transmit frame around one opcode and payload.
    ///
    /// # Errors
    ///
    /// Returns an error when `payload` exceeds the 254 bytes the one-byte
    /// length field can describe.
    ///
    /// ```
    /// use aqs::FrameCodec;
    ///
    /// let frame = FrameCodec::encode(0x01, &[0x01])?;
    /// assert_eq!(vec![0x7E, 0x02, 0x01, 0x01, 0x00, 0xEF], frame);
    /// # Ok::<(), aqs::FrameCodecError>(())
    /// ```
    pub fn encode(opcode: u8, payload: &[u8]) -> Result<Vec<u8>, FrameCodecError> {
        if payload.len() > MAX_PAYLOAD_LEN {
            return Err(FrameCodecError::PayloadTooLarge {
                payload_len: payload.len(),
                max_payload_len: MAX_PAYLOAD_LEN,
            });
        }

        let length = u8::try_from(1 + payload.len())
            .expect("payload length is bounded by MAX_PAYLOAD_LEN");

        let mut frame = Vec::with_capacity(payload.len() + MIN_FRAME_LEN);
        frame.push(START_MARKER);
        frame.push(length);
        frame.push(opcode);
        frame.extend_from_slice(payload);
        frame.push(Self::checksum(opcode, payload));
        frame.push(END_MARKER);
        Ok(frame)
    }

    /// Validates markers, length, and checksum, returning the frame content.
    ///
    /// # Errors
    ///
    /// Returns an error when the buffer is shorter than a minimal frame,
    /// either marker is wrong, the length byte disagrees with the buffer, or
    /// the checksum does not verify. Malformed frames from a physical peer
    /// are routine; callers discard them and move on.
    ///
    /// ```
    /// use aqs::FrameCodec;
    ///
    /// let frame = FrameCodec::decode(&[0x7E, 0x04, 0x04, 0xFF, 0x88, 0x00, 0x73, 0xEF])?;
    /// assert_eq!(0x04, frame.opcode());
    /// assert_eq!(&[0xFF, 0x88, 0x00], frame.payload());
    /// # Ok::<(), aqs::FrameCodecError>(())
    /// ```
    pub fn decode(frame: &[u8]) -> Result<RawFrame<'_>, FrameCodecError> {
        if frame.len() < MIN_FRAME_LEN {
            return Err(FrameCodecError::TooShort {
                actual: frame.len(),
            });
        }

        let first = frame[0];
        if first != START_MARKER {
            return Err(FrameCodecError::BadStartMarker { actual: first });
        }
        let last = frame[frame.len() - 1];
        if last != END_MARKER {
            return Err(FrameCodecError::BadEndMarker { actual: last });
        }

        let declared = usize::from(frame[1]);
        let actual = frame.len() - FRAME_OVERHEAD;
        if declared != actual {
            return Err(FrameCodecError::LengthMismatch { declared, actual });
        }

        let opcode = frame[2];
        let payload = &frame[3..frame.len() - 2];
        let checksum = frame[frame.len() - 2];
        let computed = Self::checksum(opcode, payload);
        if computed != checksum {
            return Err(FrameCodecError::ChecksumMismatch {
                computed,
                actual: checksum,
            });
        }

        Ok(RawFrame { opcode, payload })
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    #[test]
    fn encode_assembles_markers_length_and_checksum() {
        let frame = FrameCodec::encode(0x05, &[10, 20, 30, 40, 50])
            .expect("five-byte payload should encode");
        assert_eq!(
            vec![0x7E, 0x06, 0x05, 10, 20, 30, 40, 50, 0x05 ^ 10 ^ 20 ^ 30 ^ 40 ^ 50, 0xEF],
            frame
        );
    }

    #[test]
    fn encode_accepts_empty_payload() {
        let frame = FrameCodec::encode(0x10, &[]).expect("empty payload should encode");
        assert_eq!(vec![0x7E, 0x01, 0x10, 0x10, 0xEF], frame);
    }

    #[test]
    fn encode_rejects_oversized_payload() {
        let payload = vec![0x00; MAX_PAYLOAD_LEN + 1];
        let result = FrameCodec::encode(0x01, &payload);
        assert_matches!(
            result,
            Err(FrameCodecError::PayloadTooLarge {
                payload_len,
                max_payload_len: MAX_PAYLOAD_LEN,
            }) if payload_len == MAX_PAYLOAD_LEN + 1
        );
    }

    #[test]
    fn decode_round_trips_encoded_frames() {
        let frame = FrameCodec::encode(0x21, &[26, 2, 15, 21, 4, 5]).expect("should encode");
        let decoded = FrameCodec::decode(&frame).expect("own frames should decode");
        assert_eq!(0x21, decoded.opcode());
        assert_eq!(&[26, 2, 15, 21, 4, 5], decoded.payload());
    }

    #[rstest]
    #[case::empty(&[], 0)]
    #[case::four_bytes(&[0x7E, 0x01, 0x10, 0xEF], 4)]
    fn decode_rejects_short_buffers(#[case] frame: &[u8], #[case] expected_len: usize) {
        let result = FrameCodec::decode(frame);
        assert_matches!(
            result,
            Err(FrameCodecError::TooShort { actual }) if actual == expected_len
        );
    }

    #[test]
    fn decode_rejects_bad_start_marker() {
        let result = FrameCodec::decode(&[0x7F, 0x02, 0x01, 0x01, 0x00, 0xEF]);
        assert_matches!(result, Err(FrameCodecError::BadStartMarker { actual: 0x7F }));
    }

    #[test]
    fn decode_rejects_bad_end_marker() {
        let result = FrameCodec::decode(&[0x7E, 0x02, 0x01, 0x01, 0x00, 0xEE]);
        assert_matches!(result, Err(FrameCodecError::BadEndMarker { actual: 0xEE }));
    }

    #[rstest]
    #[case::declares_too_many(&[0x7E, 0x03, 0x01, 0x01, 0x00, 0xEF], 3, 2)]
    #[case::declares_zero(&[0x7E, 0x00, 0x01, 0x01, 0x00, 0xEF], 0, 2)]
    fn decode_rejects_length_mismatch(
        #[case] frame: &[u8],
        #[case] declared: usize,
        #[case] actual: usize,
    ) {
        let result = FrameCodec::decode(frame);
        assert_matches!(
            result,
            Err(FrameCodecError::LengthMismatch {
                declared: d,
                actual: a,
            }) if d == declared && a == actual
        );
    }

    #[test]
    fn decode_rejects_checksum_mismatch() {
        let result = FrameCodec::decode(&[0x7E, 0x02, 0x01, 0x01, 0x01, 0xEF]);
        assert_matches!(
            result,
            Err(FrameCodecError::ChecksumMismatch {
                computed: 0x00,
                actual: 0x01,
            })
        );
    }

    #[test]
    fn decode_rejects_any_single_payload_bit_flip() {
        let pristine =
            FrameCodec::encode(0x81, &[0x01, 0x4B, 0x02, 0x3B, 0x82, 0xF6]).expect("should encode");

        // Content bytes sit between the length byte and the checksum.
        for index in 2..pristine.len() - 2 {
            for bit in 0..8 {
                let mut corrupted = pristine.clone();
                corrupted[index] ^= 1 << bit;
                let result = FrameCodec::decode(&corrupted);
                assert_matches!(
                    result,
                    Err(FrameCodecError::ChecksumMismatch { .. }),
                    "flipping bit {bit} of byte {index} must fail checksum verification"
                );
            }
        }
    }
}
