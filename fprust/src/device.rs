//! High-level device interface
//!
//! One `Device` owns one transport handle. Every operation is a strictly
//! synchronous command/acknowledge exchange; bulk transfers run between the
//! acknowledge of the triggering command and the end-of-data packet. The
//! engine never retries on its own: a caller wanting retry-on-timeout
//! composes it explicitly.

use std::time::Duration;

use bytes::Bytes;
use tracing::{debug, info, trace, warn};

use fprust_core::{
    constants::{IMAGE_SIZE, NOTEPAD_PAGE_SIZE, TEMPLATE_SIZE},
    split_chunks, Command, Confirmation, Packet, PacketKind, Reassembler, Session,
    TransferState, FRAME_HEADER_SIZE,
};
use fprust_transport::{SerialTransport, Transport};
use fprust_types::{CharBuffer, NotepadPage, SearchHit, SystemParameters};

use crate::error::{Error, Result};

/// FPM-10 fingerprint module
///
/// High-level interface over the serial protocol. Operations return
/// device-side failures as [`Error::Device`] with the named confirmation
/// code; callers decide whether an outcome such as "no finger" is terminal.
///
/// # Examples
///
/// ```no_run
/// use fprust::{CharBuffer, Device};
///
/// #[tokio::main]
/// async fn main() -> fprust::Result<()> {
///     let mut device = Device::open(0, 57600)?;
///     device.connect().await?;
///
///     device.generate_image().await?;
///     device.image_to_template(CharBuffer::One).await?;
///     let hit = device.search(CharBuffer::One, 0, 150).await?;
///     println!("Matched {}", hit);
///
///     device.disconnect().await?;
///     Ok(())
/// }
/// ```
pub struct Device {
    transport: Box<dyn Transport>,
    session: Session,
    timeout: Duration,
}

impl Device {
    /// Create a device on serial port index 0..=3 (/dev/ttyUSB{n})
    ///
    /// # Errors
    ///
    /// Configuration errors (bad port index, unrecognized baud rate) are
    /// reported here, before the line is touched.
    pub fn open(port_index: u8, baud: u32) -> Result<Self> {
        Ok(Self::with_transport(Box::new(SerialTransport::new(
            port_index, baud,
        )?)))
    }

    /// Create a device over a caller-supplied transport
    pub fn with_transport(transport: Box<dyn Transport>) -> Self {
        Self {
            transport,
            session: Session::new(),
            timeout: Duration::from_secs(5),
        }
    }

    /// Set the per-exchange reply timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Address a specific device instead of broadcast
    pub fn with_address(mut self, address: u32) -> Self {
        self.session.set_address(address);
        self
    }

    /// Opt in to destructive commands (library empty)
    pub fn allow_dangerous(mut self, allowed: bool) -> Self {
        self.session.allow_dangerous(allowed);
        self
    }

    /// Check if connected
    pub fn is_connected(&self) -> bool {
        self.transport.is_connected()
    }

    /// Open the transport and verify the module responds
    ///
    /// Performs the zero-argument handshake; the session is usable only
    /// after the module acknowledges it.
    pub async fn connect(&mut self) -> Result<()> {
        info!("Connecting to {}...", self.transport.descriptor());

        self.transport.connect().await?;
        self.handshake().await?;

        info!("Module responding at address 0x{:08X}", self.session.address());
        Ok(())
    }

    /// Close the transport
    pub async fn disconnect(&mut self) -> Result<()> {
        if !self.is_connected() {
            return Ok(());
        }

        info!("Disconnecting from {}...", self.transport.descriptor());
        self.transport.disconnect().await?;
        Ok(())
    }

    // Command primitives

    /// Send one command and await its acknowledge
    ///
    /// Returns the confirmation code and result bytes as a value; callers
    /// decide whether a non-success code is terminal. Framing failures and
    /// timeouts are errors and are never retried here.
    pub async fn send_command(
        &mut self,
        command: Command,
        args: &[u8],
    ) -> Result<(Confirmation, Bytes)> {
        self.ensure_connected()?;

        let packet = self.session.command_packet(command, args)?;

        trace!("Sending: {:?}", packet);
        self.transport.send(&packet.encode()).await?;

        let reply = self.receive_reply().await?;
        trace!("Received: {:?}", reply);

        if reply.kind != PacketKind::Acknowledge {
            return Err(fprust_core::Error::InvalidPacket(reply.kind).into());
        }

        let payload = reply.payload;
        if payload.is_empty() {
            return Err(Error::InvalidResponse(
                "acknowledge carries no confirmation code".into(),
            ));
        }

        let confirmation = Confirmation::from_raw(payload[0]);
        debug!("{} -> {}", command, confirmation);

        Ok((confirmation, payload.slice(1..)))
    }

    /// Send a command and require a success confirmation
    async fn execute(&mut self, command: Command, args: &[u8]) -> Result<Bytes> {
        let (confirmation, result) = self.send_command(command, args).await?;
        if !confirmation.is_success() {
            return Err(Error::Device(confirmation));
        }
        Ok(result)
    }

    async fn receive_reply(&mut self) -> Result<Packet> {
        // Fixed 9-byte header first, then exactly the advertised remainder
        let mut frame = self
            .transport
            .receive_exact(FRAME_HEADER_SIZE, self.timeout)
            .await?;

        let remainder = u16::from_be_bytes([frame[7], frame[8]]) as usize;
        // The length field covers at least the two checksum bytes; reject
        // here rather than handing the transport a zero-length read
        if remainder < 2 {
            return Err(fprust_core::Error::MalformedLength(remainder as u16).into());
        }
        let rest = self.transport.receive_exact(remainder, self.timeout).await?;
        frame.unsplit(rest);

        Ok(Packet::decode(frame)?)
    }

    // Session management

    /// Zero-argument presence check
    pub async fn handshake(&mut self) -> Result<()> {
        self.execute(Command::Handshake, &[]).await?;
        Ok(())
    }

    /// Verify the module handshake password
    pub async fn verify_password(&mut self, password: u32) -> Result<()> {
        self.execute(Command::VerifyPassword, &password.to_be_bytes())
            .await?;
        Ok(())
    }

    /// Set a new handshake password
    pub async fn set_password(&mut self, password: u32) -> Result<()> {
        self.execute(Command::SetPassword, &password.to_be_bytes())
            .await?;
        Ok(())
    }

    /// Read the 16-byte system parameter record
    pub async fn read_system_parameters(&mut self) -> Result<SystemParameters> {
        let result = self.execute(Command::ReadSystemParameters, &[]).await?;
        Ok(SystemParameters::try_from(result.as_ref())?)
    }

    /// Write one system parameter
    ///
    /// Parameter numbers are listed in [`fprust_core::constants::params`]:
    /// baud control, security level, packet size code.
    pub async fn set_system_parameter(&mut self, parameter: u8, value: u8) -> Result<()> {
        self.execute(Command::SetSystemParameter, &[parameter, value])
            .await?;
        Ok(())
    }

    /// Assign a new device address and rebind the session to it
    pub async fn set_address(&mut self, address: u32) -> Result<()> {
        self.execute(Command::SetAddress, &address.to_be_bytes())
            .await?;

        self.session.set_address(address);
        info!("Session rebound to address 0x{address:08X}");
        Ok(())
    }

    /// Fetch a random number from the module's generator
    pub async fn random_number(&mut self) -> Result<u32> {
        let result = self.execute(Command::RandomNumber, &[]).await?;

        let bytes: [u8; 4] = result.as_ref().try_into().map_err(|_| {
            Error::InvalidResponse(format!("random number payload of {} bytes", result.len()))
        })?;
        Ok(u32::from_be_bytes(bytes))
    }

    // Image acquisition and matching

    /// Capture a finger image into the image buffer
    ///
    /// [`Confirmation::NoFinger`] is an expected outcome callers poll on.
    pub async fn generate_image(&mut self) -> Result<()> {
        self.execute(Command::GenImage, &[]).await?;
        Ok(())
    }

    /// Convert the captured image into a character file
    pub async fn image_to_template(&mut self, buffer: CharBuffer) -> Result<()> {
        self.execute(Command::ImageToTemplate, &[buffer.id()]).await?;
        Ok(())
    }

    /// Combine character buffers 1 and 2 into a template model
    pub async fn register_model(&mut self) -> Result<()> {
        self.execute(Command::RegisterModel, &[]).await?;
        Ok(())
    }

    /// Compare the two character buffers, returning the matching score
    pub async fn match_templates(&mut self) -> Result<u16> {
        let result = self.execute(Command::Match, &[]).await?;
        Self::read_u16(&result, "match score")
    }

    /// Search the library for the template in `buffer`
    pub async fn search(
        &mut self,
        buffer: CharBuffer,
        start_page: u16,
        page_count: u16,
    ) -> Result<SearchHit> {
        let mut args = [0u8; 5];
        args[0] = buffer.id();
        args[1..3].copy_from_slice(&start_page.to_be_bytes());
        args[3..5].copy_from_slice(&page_count.to_be_bytes());

        let result = self.execute(Command::Search, &args).await?;
        Ok(SearchHit::from_payload(&result)?)
    }

    // Template library

    /// Store the template in `buffer` at the given library page
    pub async fn store(&mut self, buffer: CharBuffer, page_id: u16) -> Result<()> {
        let mut args = [0u8; 3];
        args[0] = buffer.id();
        args[1..3].copy_from_slice(&page_id.to_be_bytes());

        self.execute(Command::Store, &args).await?;
        Ok(())
    }

    /// Load a library page into `buffer`
    pub async fn load(&mut self, buffer: CharBuffer, page_id: u16) -> Result<()> {
        let mut args = [0u8; 3];
        args[0] = buffer.id();
        args[1..3].copy_from_slice(&page_id.to_be_bytes());

        self.execute(Command::Load, &args).await?;
        Ok(())
    }

    /// Delete `count` templates starting at `page_id`
    pub async fn delete_template(&mut self, page_id: u16, count: u16) -> Result<()> {
        let mut args = [0u8; 4];
        args[0..2].copy_from_slice(&page_id.to_be_bytes());
        args[2..4].copy_from_slice(&count.to_be_bytes());

        self.execute(Command::DeleteTemplate, &args).await?;
        Ok(())
    }

    /// Erase the whole template library
    ///
    /// Refused with [`fprust_core::Error::OperationDisabled`] unless the
    /// device was built with [`Device::allow_dangerous`]; nothing reaches
    /// the transport in that case.
    pub async fn empty_library(&mut self) -> Result<()> {
        warn!("Emptying template library");
        self.execute(Command::EmptyLibrary, &[]).await?;
        Ok(())
    }

    /// Number of templates currently stored
    pub async fn template_count(&mut self) -> Result<u16> {
        let result = self.execute(Command::TemplateCount, &[]).await?;
        Self::read_u16(&result, "template count")
    }

    /// Read one 32-byte page of the template occupancy bitmap
    pub async fn read_index_table(&mut self, index_page: u8) -> Result<Bytes> {
        let result = self.execute(Command::ReadIndexTable, &[index_page]).await?;
        if result.len() != 32 {
            return Err(Error::InvalidResponse(format!(
                "index table page of {} bytes",
                result.len()
            )));
        }
        Ok(result)
    }

    // Notepad

    /// Write one 32-byte notepad page
    pub async fn write_notepad(
        &mut self,
        page: NotepadPage,
        data: &[u8; NOTEPAD_PAGE_SIZE],
    ) -> Result<()> {
        let mut args = Vec::with_capacity(1 + NOTEPAD_PAGE_SIZE);
        args.push(page.number());
        args.extend_from_slice(data);

        self.execute(Command::WriteNotepad, &args).await?;
        Ok(())
    }

    /// Read one 32-byte notepad page
    pub async fn read_notepad(&mut self, page: NotepadPage) -> Result<Bytes> {
        let result = self.execute(Command::ReadNotepad, &[page.number()]).await?;
        if result.len() != NOTEPAD_PAGE_SIZE {
            return Err(Error::InvalidResponse(format!(
                "notepad page of {} bytes",
                result.len()
            )));
        }
        Ok(result)
    }

    // Bulk transfers

    /// Stream the raw image buffer out of the module (256x288 bytes)
    pub async fn upload_image(&mut self) -> Result<Bytes> {
        self.execute(Command::UploadImage, &[]).await?;
        self.receive_stream(IMAGE_SIZE).await
    }

    /// Stream a raw image into the module's image buffer
    pub async fn download_image(&mut self, image: &[u8]) -> Result<()> {
        if image.len() != IMAGE_SIZE {
            return Err(Error::InvalidBufferLength {
                expected: IMAGE_SIZE,
                actual: image.len(),
            });
        }

        self.execute(Command::DownloadImage, &[]).await?;
        self.send_stream(image).await
    }

    /// Stream the character file in `buffer` out of the module
    pub async fn upload_template(&mut self, buffer: CharBuffer) -> Result<Bytes> {
        self.execute(Command::UploadTemplate, &[buffer.id()]).await?;
        self.receive_stream(TEMPLATE_SIZE).await
    }

    /// Stream a character file into `buffer`
    pub async fn download_template(&mut self, buffer: CharBuffer, data: &[u8]) -> Result<()> {
        if data.len() != TEMPLATE_SIZE {
            return Err(Error::InvalidBufferLength {
                expected: TEMPLATE_SIZE,
                actual: data.len(),
            });
        }

        self.execute(Command::DownloadTemplate, &[buffer.id()]).await?;
        self.send_stream(data).await
    }

    // Helpers

    fn ensure_connected(&self) -> Result<()> {
        if !self.is_connected() {
            return Err(Error::NotConnected);
        }
        Ok(())
    }

    fn read_u16(result: &Bytes, what: &str) -> Result<u16> {
        let bytes: [u8; 2] = result.as_ref().try_into().map_err(|_| {
            Error::InvalidResponse(format!("{what} payload of {} bytes", result.len()))
        })?;
        Ok(u16::from_be_bytes(bytes))
    }

    async fn receive_stream(&mut self, expected: usize) -> Result<Bytes> {
        let mut reassembler = Reassembler::new(expected);

        // Bounded: even a stream of one-byte chunks terminates
        for _ in 0..=expected {
            let packet = self.receive_reply().await?;
            if reassembler.push(&packet)? == TransferState::Complete {
                debug!(
                    bytes = reassembler.len(),
                    missing_terminator = reassembler.missing_terminator(),
                    "bulk download complete"
                );
                return Ok(reassembler.finish()?);
            }
        }

        Err(Error::InvalidResponse(
            "bulk transfer stalled before completion".into(),
        ))
    }

    async fn send_stream(&mut self, buf: &[u8]) -> Result<()> {
        let packets = split_chunks(self.session.address(), buf)?;
        debug!(chunks = packets.len(), bytes = buf.len(), "bulk upload");

        // No per-chunk acknowledgement; flow control is transport-level
        for packet in &packets {
            self.transport.send(&packet.encode()).await?;
        }
        Ok(())
    }
}
