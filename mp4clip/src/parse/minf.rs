#![allow(missing_docs)]

use bytes::{Buf, BufMut, BytesMut};

use crate::error::Result;

use super::error::{MissingRequiredBox, ParseResultExt, WhileParsingBox};
use super::mp4box::{parse_child, put_child};
use super::{
    BoxHeader, DinfBox, FourCC, HdlrBox, Mp4Box, ParseBox, ParseError, ParsedBox, SmhdBox, StblBox, VmhdBox,
};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MinfBox {
    pub vmhd: Option<VmhdBox>,
    pub smhd: Option<SmhdBox>,
    pub dinf: Option<DinfBox>,
    pub stbl: StblBox,
    pub hdlr: Option<HdlrBox>,
}

const NAME: FourCC = FourCC::MINF;

impl ParseBox for MinfBox {
    const NAME: FourCC = NAME;

    fn parse(buf: &mut BytesMut) -> Result<Self, ParseError> {
        let mut vmhd = None;
        let mut smhd = None;
        let mut dinf = None;
        let mut stbl = None;
        let mut hdlr = None;
        while buf.has_remaining() {
            let header = BoxHeader::parse(&mut *buf).while_parsing_box(NAME)?;
            let mut data = header.take_data(buf)?;
            match header.box_type() {
                FourCC::VMHD => put_child(&mut vmhd, parse_child(&mut data, NAME)?, NAME, FourCC::VMHD)?,
                FourCC::SMHD => put_child(&mut smhd, parse_child(&mut data, NAME)?, NAME, FourCC::SMHD)?,
                FourCC::DINF => put_child(&mut dinf, parse_child(&mut data, NAME)?, NAME, FourCC::DINF)?,
                FourCC::STBL => put_child(&mut stbl, parse_child(&mut data, NAME)?, NAME, FourCC::STBL)?,
                FourCC::HDLR => put_child(&mut hdlr, parse_child(&mut data, NAME)?, NAME, FourCC::HDLR)?,
                other => bail_attach!(ParseError::UnknownBoxType(other), WhileParsingBox(NAME)),
            }
        }
        let stbl = stbl.ok_or_else(|| {
            report_attach!(ParseError::BadFormat, MissingRequiredBox(FourCC::STBL), WhileParsingBox(NAME))
        })?;
        Ok(Self { vmhd, smhd, dinf, stbl, hdlr })
    }
}

impl ParsedBox for MinfBox {
    fn encoded_len(&self) -> u64 {
        let mut len = 0;
        if let Some(vmhd) = &self.vmhd {
            len += vmhd.encoded_size();
        }
        if let Some(smhd) = &self.smhd {
            len += smhd.encoded_size();
        }
        if let Some(dinf) = &self.dinf {
            len += dinf.encoded_size();
        }
        len += self.stbl.encoded_size();
        if let Some(hdlr) = &self.hdlr {
            len += hdlr.encoded_size();
        }
        len
    }

    fn put_buf(&self, mut out: &mut dyn BufMut) {
        if let Some(vmhd) = &self.vmhd {
            vmhd.put_box(&mut out);
        }
        if let Some(smhd) = &self.smhd {
            smhd.put_box(&mut out);
        }
        if let Some(dinf) = &self.dinf {
            dinf.put_box(&mut out);
        }
        self.stbl.put_box(&mut out);
        if let Some(hdlr) = &self.hdlr {
            hdlr.put_box(&mut out);
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    impl MinfBox {
        pub(crate) fn dummy() -> Self {
            Self {
                vmhd: Some(VmhdBox { header: Default::default(), graphics_mode: 0, op_color: [0; 3] }),
                smhd: None,
                dinf: Some(DinfBox::dummy()),
                stbl: StblBox::dummy(),
                hdlr: None,
            }
        }
    }

    #[test]
    fn roundtrip() {
        let minf = MinfBox::dummy();
        let mut buf = BytesMut::new();
        minf.put_buf(&mut buf);
        assert_eq!(buf.len() as u64, minf.encoded_len());
        assert_eq!(MinfBox::parse(&mut buf).unwrap(), minf);
    }

    #[test]
    fn missing_stbl_rejected() {
        let mut buf = DinfBox::dummy().to_bytes();
        let err = MinfBox::parse(&mut buf).unwrap_err();
        assert!(matches!(err.get_ref(), ParseError::BadFormat), "{err}");
    }
}
